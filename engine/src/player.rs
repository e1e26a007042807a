//! Arcade player movement, aim and reach.

use crate::court::{Bounds, Side};
use crate::stamina::Stamina;
use tennis_shared::config::PlayerConfig;
use tennis_shared::events::{PlayerKind, PlayerTag};
use tennis_shared::vec3::{self, Vec3};

/// Aim yaw limit either side of straight ahead (degrees)
pub const MAX_AIM_ANGLE: f64 = 90.0;

/// Closer than this to a move target counts as arrived.
const ARRIVE_DISTANCE: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub kind: PlayerKind,
    pub side: Side,
    pub position: Vec3,
    pub stamina: Stamina,
    config: PlayerConfig,
    bounds: Bounds,
    /// Unit heading in the ground plane; zero when standing still
    heading: Vec3,
    sprinting: bool,
    /// Aim yaw in degrees relative to the side's forward direction
    aim_angle: f64,
    /// Ground-plane velocity over the last tick
    velocity: Vec3,
}

impl Player {
    pub fn new(id: u32, kind: PlayerKind, side: Side, bounds: Bounds, config: PlayerConfig) -> Self {
        Self {
            id,
            kind,
            side,
            position: Vec3::ZERO,
            stamina: Stamina::new(&config),
            config,
            bounds,
            heading: Vec3::ZERO,
            sprinting: false,
            aim_angle: 0.0,
            velocity: Vec3::ZERO,
        }
    }

    pub fn tag(&self) -> PlayerTag {
        PlayerTag {
            id: self.id,
            kind: self.kind,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_moving(&self) -> bool {
        self.heading != Vec3::ZERO
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// Walk (or sprint) along `direction`; a zero direction stops.
    pub fn set_movement(&mut self, direction: Vec3, sprint: bool) {
        self.heading = vec3::try_normalize(vec3::horizontal(direction)).unwrap_or(Vec3::ZERO);
        self.sprinting = sprint && !self.stamina.is_empty();
    }

    pub fn stop(&mut self) {
        self.heading = Vec3::ZERO;
        self.sprinting = false;
    }

    /// Head for `target`, stopping once there.
    pub fn steer_toward(&mut self, target: Vec3, sprint: bool) {
        let offset = vec3::horizontal(vec3::sub(target, self.position));
        if vec3::length(offset) < ARRIVE_DISTANCE {
            self.stop();
        } else {
            self.set_movement(offset, sprint);
        }
    }

    /// Snap to `position` (clamped) and stand still.
    pub fn place(&mut self, position: Vec3) {
        self.position = self.bounds.clamp(position);
        self.velocity = Vec3::ZERO;
        self.stop();
    }

    pub fn speed(&self) -> f64 {
        if self.sprinting {
            self.config.movement_speed * self.config.sprint_multiplier
        } else {
            self.config.movement_speed
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.stamina.update(dt, self.sprinting && self.is_moving());
        if self.stamina.is_empty() {
            self.sprinting = false;
        }

        let before = self.position;
        let step = vec3::scale(self.heading, self.speed() * dt);
        self.position = self.bounds.clamp(vec3::add(self.position, step));
        self.velocity = if dt > 0.0 {
            vec3::scale(vec3::sub(self.position, before), 1.0 / dt)
        } else {
            Vec3::ZERO
        };
    }

    pub fn aim_angle(&self) -> f64 {
        self.aim_angle
    }

    /// Turn the aim by `delta` degrees, clamped to ±90.
    pub fn adjust_aim(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.aim_angle = (self.aim_angle + delta).clamp(-MAX_AIM_ANGLE, MAX_AIM_ANGLE);
    }

    pub fn set_aim(&mut self, angle: f64) {
        self.aim_angle = 0.0;
        self.adjust_aim(angle);
    }

    /// Unit aim direction in the ground plane.
    pub fn aim_direction(&self) -> Vec3 {
        vec3::rotate_y(self.side.forward(), self.aim_angle.to_radians())
    }

    /// Ball close enough horizontally and low enough to strike.
    pub fn can_reach(&self, ball: Vec3) -> bool {
        vec3::distance_xz(self.position, ball) <= self.config.reach_radius
            && ball.y <= self.config.reach_height
    }

    /// Where the ball is held when this player serves.
    pub fn serve_point(&self) -> Vec3 {
        let ahead = vec3::scale(self.side.forward(), self.config.serve_offset);
        let mut point = vec3::add(self.position, ahead);
        point.y = self.config.serve_height;
        point
    }
}
