//! Court geometry: zone classification, net crossings, arena bounds and
//! per-side player boxes. Player one defends z < 0 (ZoneA), player two z > 0.

use crate::error::{EngineError, Result};
use tennis_shared::config::{CourtConfig, PhysicsConfig, PlayerConfig};
use tennis_shared::events::Zone;
use tennis_shared::vec3::{vec3, Vec3};

/// Minimum gap kept between a player and the net.
const NET_CLEARANCE: f64 = 1.0;

/// Which end of the court a player defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn index(&self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Sign of z on this side's half.
    pub fn sign(&self) -> f64 {
        match self {
            Side::One => -1.0,
            Side::Two => 1.0,
        }
    }

    /// Direction toward the opponent.
    pub fn forward(&self) -> Vec3 {
        vec3(0.0, 0.0, -self.sign())
    }

    pub fn zone(&self) -> Zone {
        match self {
            Side::One => Zone::ZoneA,
            Side::Two => Zone::ZoneB,
        }
    }
}

/// Axis-aligned box on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        vec3(
            p.x.clamp(self.min_x, self.max_x),
            p.y,
            p.z.clamp(self.min_z, self.max_z),
        )
    }

    /// Same box shrunk by `inset` on every edge, never past its center.
    pub fn inset(&self, inset: f64) -> Bounds {
        let cx = (self.min_x + self.max_x) * 0.5;
        let cz = (self.min_z + self.max_z) * 0.5;
        Bounds {
            min_x: (self.min_x + inset).min(cx),
            max_x: (self.max_x - inset).max(cx),
            min_z: (self.min_z + inset).min(cz),
            max_z: (self.max_z - inset).max(cz),
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }
}

/// Ball against the net this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetContact {
    /// Points back toward the side the ball came from
    pub normal: Vec3,
    /// Ball center moved back to just touch the net
    pub resolved_position: Vec3,
}

#[derive(Debug, Clone)]
pub struct Court {
    config: CourtConfig,
    surface_level: f64,
    ball_radius: f64,
}

impl Court {
    pub fn new(config: CourtConfig, physics: &PhysicsConfig) -> Self {
        Self {
            config,
            surface_level: physics.surface_level,
            ball_radius: physics.ball_radius,
        }
    }

    pub fn config(&self) -> &CourtConfig {
        &self.config
    }

    /// Zone under a ground position.
    pub fn classify(&self, pos: Vec3) -> Zone {
        if pos.x.abs() > self.config.half_width || pos.z.abs() > self.config.half_length {
            return Zone::OutOfBounds;
        }
        if pos.z < 0.0 {
            Zone::ZoneA
        } else {
            Zone::ZoneB
        }
    }

    /// Past the arena walls; the ball is dead.
    pub fn left_arena(&self, pos: Vec3) -> bool {
        let margin = self.config.arena_margin;
        !pos.is_finite()
            || pos.x.abs() > self.config.half_width + margin
            || pos.z.abs() > self.config.half_length + margin
    }

    /// Net contact for a ball moving from `prev` to `next`, if any.
    pub fn net_contact(&self, prev: Vec3, next: Vec3) -> Option<NetContact> {
        let r = self.ball_radius;
        let side = prev.z.signum();
        if prev.z == 0.0 || prev.z * side < r || next.z * side >= r {
            return None;
        }
        if next.x.abs() > self.config.half_width {
            return None;
        }
        let net_top = self.surface_level + self.config.net_height;
        let bottom = prev.y.min(next.y) - r;
        if bottom >= net_top {
            return None;
        }
        Some(NetContact {
            normal: vec3(0.0, 0.0, side),
            resolved_position: vec3(next.x, next.y, side * r),
        })
    }

    /// Where a player on `side` may stand.
    pub fn player_bounds(&self, side: Side, players: &PlayerConfig) -> Bounds {
        let x = self.config.half_width + players.sideline_margin;
        let far = self.config.half_length + players.backcourt_depth;
        let (min_z, max_z) = match side {
            Side::One => (-far, -NET_CLEARANCE),
            Side::Two => (NET_CLEARANCE, far),
        };
        Bounds {
            min_x: -x,
            max_x: x,
            min_z,
            max_z,
        }
    }

    /// Center of the baseline on `side`.
    pub fn baseline(&self, side: Side) -> Vec3 {
        vec3(0.0, 0.0, side.sign() * self.config.half_length)
    }

    /// Lateral offset of the aim points used to wrong-foot an opponent.
    pub fn quarter_width(&self) -> f64 {
        self.config.half_width * 0.5
    }
}

/// Parse a collision-geometry tag into a zone.
pub fn parse_zone(tag: &str) -> Result<Zone> {
    Zone::from_tag(tag).ok_or_else(|| EngineError::UnknownZone(tag.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn court() -> Court {
        Court::new(CourtConfig::default(), &PhysicsConfig::default())
    }

    #[test]
    fn halves_split_at_the_net() {
        let court = court();
        assert_eq!(court.classify(vec3(0.0, 0.0, -3.0)), Zone::ZoneA);
        assert_eq!(court.classify(vec3(2.0, 0.0, 3.0)), Zone::ZoneB);
        assert_eq!(court.classify(vec3(-5.9, 0.0, 11.9)), Zone::ZoneB);
    }

    #[test]
    fn outside_lines_is_out() {
        let court = court();
        assert_eq!(court.classify(vec3(6.5, 0.0, 3.0)), Zone::OutOfBounds);
        assert_eq!(court.classify(vec3(0.0, 0.0, -12.5)), Zone::OutOfBounds);
    }

    #[test]
    fn arena_extends_past_the_lines() {
        let court = court();
        assert!(!court.left_arena(vec3(0.0, 0.0, 15.0)));
        assert!(court.left_arena(vec3(0.0, 0.0, 21.0)));
        assert!(court.left_arena(vec3(-14.5, 0.0, 0.0)));
        assert!(court.left_arena(vec3(f64::NAN, 0.0, 0.0)));
    }

    #[test]
    fn low_ball_crossing_hits_net() {
        let court = court();
        let contact = court
            .net_contact(vec3(1.0, 0.6, -0.4), vec3(1.0, 0.55, 0.1))
            .expect("should hit the net");
        assert_eq!(contact.normal, vec3(0.0, 0.0, -1.0));
        assert_eq!(contact.resolved_position.z, -0.25);
    }

    #[test]
    fn net_normal_faces_the_incoming_side() {
        let court = court();
        let contact = court
            .net_contact(vec3(0.0, 0.5, 0.5), vec3(0.0, 0.5, -0.2))
            .unwrap();
        assert_eq!(contact.normal, vec3(0.0, 0.0, 1.0));
        assert_eq!(contact.resolved_position.z, 0.25);
    }

    #[test]
    fn high_or_wide_ball_clears_net() {
        let court = court();
        assert!(court
            .net_contact(vec3(0.0, 2.0, -0.5), vec3(0.0, 2.0, 0.5))
            .is_none());
        assert!(court
            .net_contact(vec3(7.0, 0.5, -0.5), vec3(7.0, 0.5, 0.5))
            .is_none());
    }

    #[test]
    fn ball_leaving_the_net_is_not_a_contact() {
        let court = court();
        // Pushed back to touching distance and moving away.
        assert!(court
            .net_contact(vec3(0.0, 0.5, -0.25), vec3(0.0, 0.5, -0.4))
            .is_none());
        // Staying on one side.
        assert!(court
            .net_contact(vec3(0.0, 0.5, -3.0), vec3(0.0, 0.5, -2.0))
            .is_none());
    }

    #[test]
    fn player_boxes_stay_off_the_net() {
        let court = court();
        let players = PlayerConfig::default();
        let one = court.player_bounds(Side::One, &players);
        let two = court.player_bounds(Side::Two, &players);
        assert!(one.max_z < 0.0);
        assert!(two.min_z > 0.0);
        assert_eq!(one.min_z, -two.max_z);

        let clamped = one.clamp(vec3(100.0, 1.0, 5.0));
        assert_eq!(clamped, vec3(10.0, 1.0, -1.0));
        assert!(one.contains(clamped));
    }

    #[test]
    fn inset_never_inverts() {
        let b = Bounds {
            min_x: -1.0,
            max_x: 1.0,
            min_z: 0.0,
            max_z: 10.0,
        };
        let shrunk = b.inset(2.0);
        assert_eq!((shrunk.min_x, shrunk.max_x), (0.0, 0.0));
        assert_eq!((shrunk.min_z, shrunk.max_z), (2.0, 8.0));
    }

    #[test]
    fn side_helpers_are_mirrored() {
        assert_eq!(Side::One.forward(), vec3(0.0, 0.0, 1.0));
        assert_eq!(Side::Two.forward(), vec3(0.0, 0.0, -1.0));
        assert_eq!(Side::One.opponent(), Side::Two);
        assert_eq!(Side::Two.zone(), Zone::ZoneB);
        assert_eq!(court().baseline(Side::One), vec3(0.0, 0.0, -12.0));
    }

    #[test]
    fn unknown_tags_are_errors() {
        assert_eq!(parse_zone("ZoneA").unwrap(), Zone::ZoneA);
        assert!(matches!(
            parse_zone("GroundArea"),
            Err(EngineError::UnknownZone(tag)) if tag == "GroundArea"
        ));
    }
}
