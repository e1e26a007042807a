//! Computer-controlled player.
//!
//! A small state machine driven by the match:
//! - `on_ball_hit()` when anyone strikes the ball
//! - `begin_serve()` when it is this player's turn to serve
//! - `tick()` every frame, which steers the player and may return a shot

use crate::ball::BallState;
use crate::court::{Court, Side};
use crate::player::Player;
use crate::shot::ShotCommand;
use crate::trajectory::{self, Gravity};
use rand::Rng;
use tennis_shared::config::AiConfig;
use tennis_shared::events::ShotType;
use tennis_shared::vec3::{self, vec3, Vec3};

/// Targets are kept this far inside the player's bounds.
const TARGET_INSET: f64 = 2.0;
/// Random depth spread around the opponent when picking an aim point.
const AIM_DEPTH_SPREAD: f64 = 3.0;
const LOB_STAMINA: f64 = 50.0;
const TOPSPIN_STAMINA: f64 = 30.0;
/// Roll above which an eligible topspin is taken.
const TOPSPIN_ROLL: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AiState {
    Idle,
    MoveToPosition,
    PrepareForShot,
    RecoverPosition,
}

/// What the AI can see this frame.
pub struct AiView<'a> {
    pub ball: &'a BallState,
    pub opponent: &'a Player,
    pub court: &'a Court,
}

#[derive(Debug)]
pub struct AiController {
    config: AiConfig,
    gravity: Gravity,
    floor: f64,
    state: AiState,
    target: Vec3,
    neutral: Vec3,
    ball_approaching: bool,
    /// Remaining reaction delay before moving to a new ball
    decision_timer: f64,
    /// Remaining delay before serving, when serving
    serve_timer: Option<f64>,
}

impl AiController {
    pub fn new(config: AiConfig, gravity: Gravity, floor: f64, neutral: Vec3) -> Self {
        Self {
            config,
            gravity,
            floor,
            state: AiState::Idle,
            target: neutral,
            neutral,
            ball_approaching: false,
            decision_timer: 0.0,
            serve_timer: None,
        }
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn is_serving(&self) -> bool {
        self.serve_timer.is_some()
    }

    /// Forget the current point and stand by.
    pub fn reset(&mut self) {
        self.state = AiState::Idle;
        self.target = self.neutral;
        self.ball_approaching = false;
        self.decision_timer = 0.0;
        self.serve_timer = None;
    }

    /// Serve after `delay` seconds.
    pub fn begin_serve(&mut self, delay: f64) {
        self.reset();
        self.serve_timer = Some(delay.max(0.0));
    }

    /// React to a shot. Only the opponent's shots start a chase.
    pub fn on_ball_hit(
        &mut self,
        hitter: Side,
        me: &Player,
        view: &AiView<'_>,
        rng: &mut impl Rng,
    ) {
        if hitter == me.side {
            return;
        }
        self.decision_timer = self.config.reaction_time;
        self.target = self.move_target(me, view, rng);
        self.ball_approaching = true;
        tracing::debug!(
            "AI {} chasing ball to ({:.2}, {:.2})",
            me.id,
            self.target.x,
            self.target.z
        );
    }

    /// Advance one frame. Returns a shot to play, if any.
    pub fn tick(
        &mut self,
        dt: f64,
        me: &mut Player,
        view: &AiView<'_>,
        rng: &mut impl Rng,
    ) -> Option<ShotCommand> {
        if let Some(ref mut delay) = self.serve_timer {
            *delay -= dt;
            me.stop();
            if *delay > 0.0 {
                return None;
            }
            self.serve_timer = None;
            self.state = AiState::RecoverPosition;
            let direction = self.shot_direction(me, view, rng);
            return Some(ShotCommand::new(ShotType::Flat, direction, 0.0));
        }

        self.decision_timer -= dt;
        if self.ball_approaching
            && self.decision_timer <= 0.0
            && !matches!(
                self.state,
                AiState::MoveToPosition | AiState::PrepareForShot
            )
        {
            self.state = AiState::MoveToPosition;
        }

        match self.state {
            AiState::Idle => me.stop(),
            AiState::MoveToPosition | AiState::PrepareForShot => {
                me.steer_toward(self.target, false);
                if self.state == AiState::MoveToPosition
                    && vec3::distance_xz(me.position, self.target) < self.config.shot_decision_radius
                {
                    self.state = AiState::PrepareForShot;
                }
                if ball_playable(me, view.ball) {
                    return Some(self.execute_shot(me, view, rng));
                }
            }
            AiState::RecoverPosition => {
                me.steer_toward(self.neutral, false);
                if vec3::distance_xz(me.position, self.neutral) < self.config.recovery_threshold {
                    self.state = AiState::Idle;
                }
            }
        }
        None
    }

    fn execute_shot(&mut self, me: &Player, view: &AiView<'_>, rng: &mut impl Rng) -> ShotCommand {
        let direction = self.shot_direction(me, view, rng);
        let (shot, hold_time) = self.choose_shot(me, view.opponent, rng);
        self.ball_approaching = false;
        self.state = AiState::RecoverPosition;
        self.target = self.neutral;
        ShotCommand::new(shot, direction, hold_time)
    }

    /// Predicted landing, pulled inside our bounds, nudged toward the opponent.
    fn move_target(&self, me: &Player, view: &AiView<'_>, rng: &mut impl Rng) -> Vec3 {
        let ball = view.ball;
        let lifted = vec3(ball.position.x, ball.position.y - self.floor, ball.position.z);
        let Some(landing) = trajectory::predict_landing(lifted, ball.velocity, self.gravity) else {
            return me.position;
        };

        let area = me.bounds().inset(TARGET_INSET);
        let clamped = area.clamp(vec3(landing.x, 0.0, landing.z));
        let toward_opponent =
            vec3::normalize(vec3::horizontal(vec3::sub(view.opponent.position, ball.position)));
        let lead = rng.gen_range(self.config.anticipation_min..=self.config.anticipation_max);
        me.bounds()
            .clamp(vec3::add(clamped, vec3::scale(toward_opponent, lead)))
    }

    /// Lob over a net-rusher from deep, topspin near the net, flat otherwise.
    /// Returns the shot and the simulated hold time.
    pub fn choose_shot(&self, me: &Player, opponent: &Player, rng: &mut impl Rng) -> (ShotType, f64) {
        let opponent_at_net = opponent.position.z.abs() < self.config.net_approach_distance;
        let deep = me.position.z.abs() >= self.config.lob_depth;
        if opponent_at_net && deep && me.stamina.current > LOB_STAMINA {
            return (ShotType::Lob, rng.gen_range(0.8..1.2));
        }

        let near_net = me.position.z.abs() < self.config.net_approach_distance;
        if near_net && me.stamina.current > TOPSPIN_STAMINA && rng.gen::<f64>() > TOPSPIN_ROLL {
            return (ShotType::Topspin, rng.gen_range(0.5..1.5));
        }

        (ShotType::Flat, 0.0)
    }

    /// Aim away from where the opponent is heading, with random yaw.
    pub fn shot_direction(&self, me: &Player, view: &AiView<'_>, rng: &mut impl Rng) -> Vec3 {
        let opponent = view.opponent;
        let lateral = opponent.velocity().x;
        let aim_x = if lateral > 0.0 {
            -view.court.quarter_width()
        } else {
            view.court.quarter_width()
        };
        let aim_z = opponent.position.z + rng.gen_range(-AIM_DEPTH_SPREAD..AIM_DEPTH_SPREAD);

        let base = vec3::try_normalize(vec3::horizontal(vec3::sub(
            vec3(aim_x, 0.0, aim_z),
            me.position,
        )))
        .unwrap_or(me.side.forward());

        let variation = self.config.shot_variation;
        let yaw = if variation > 0.0 {
            rng.gen_range(-variation..variation)
        } else {
            0.0
        };
        vec3::rotate_y(base, yaw.to_radians())
    }
}

/// On our half, heading our way and within reach.
fn ball_playable(me: &Player, ball: &BallState) -> bool {
    let sign = me.side.sign();
    ball.launched
        && ball.position.z * sign > 0.0
        && ball.velocity.z * sign > 0.0
        && me.can_reach(ball.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::BallMotion;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tennis_shared::config::MatchConfig;
    use tennis_shared::events::{PlayerKind, PlayerTag};

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    struct Fixture {
        config: MatchConfig,
        court: Court,
        human: Player,
        bot: Player,
        brain: AiController,
    }

    fn fixture() -> Fixture {
        let config = MatchConfig::default();
        let court = Court::new(config.court, &config.physics);
        let mut human = Player::new(
            1,
            PlayerKind::Human,
            Side::One,
            court.player_bounds(Side::One, &config.players),
            config.players,
        );
        human.place(court.baseline(Side::One));
        let mut bot = Player::new(
            2,
            PlayerKind::Ai,
            Side::Two,
            court.player_bounds(Side::Two, &config.players),
            config.players,
        );
        bot.place(court.baseline(Side::Two));
        let brain = AiController::new(
            config.ai,
            Gravity::new(config.physics.gravity).unwrap(),
            config.physics.floor_height(),
            court.baseline(Side::Two),
        );
        Fixture {
            config,
            court,
            human,
            bot,
            brain,
        }
    }

    fn served_ball(f: &Fixture) -> BallMotion {
        let mut ball = BallMotion::new(f.config.physics, f.human.serve_point()).unwrap();
        let launch = ShotCommand::new(ShotType::Flat, Vec3::FORWARD, 0.0).resolve(&f.config.shots);
        ball.apply_shot(launch.impulse, launch.spin, PlayerTag::human(1));
        ball
    }

    #[test]
    fn starts_idle() {
        let f = fixture();
        assert_eq!(f.brain.state(), AiState::Idle);
        assert!(!f.brain.is_serving());
    }

    #[test]
    fn own_shots_are_ignored() {
        let mut f = fixture();
        let mut rng = test_rng();
        let ball = served_ball(&f);
        let view = AiView {
            ball: ball.state(),
            opponent: &f.human,
            court: &f.court,
        };
        f.brain.on_ball_hit(Side::Two, &f.bot, &view, &mut rng);
        let shot = f.brain.tick(0.5, &mut f.bot, &view, &mut rng);
        assert!(shot.is_none());
        assert_eq!(f.brain.state(), AiState::Idle);
    }

    #[test]
    fn waits_reaction_time_then_moves_toward_landing() {
        let mut f = fixture();
        let mut rng = test_rng();
        let ball = served_ball(&f);
        let view = AiView {
            ball: ball.state(),
            opponent: &f.human,
            court: &f.court,
        };
        f.brain.on_ball_hit(Side::One, &f.bot, &view, &mut rng);

        f.brain.tick(0.1, &mut f.bot, &view, &mut rng);
        assert_eq!(f.brain.state(), AiState::Idle);

        f.brain.tick(0.1, &mut f.bot, &view, &mut rng);
        assert_eq!(f.brain.state(), AiState::MoveToPosition);

        // Served straight down the middle; the target lies on our half.
        let target = f.brain.target();
        assert!(target.z > 0.0);
        assert!(f.bot.bounds().contains(target));
    }

    #[test]
    fn returns_a_served_ball() {
        let mut f = fixture();
        let mut rng = test_rng();
        let mut ball = served_ball(&f);
        {
            let view = AiView {
                ball: ball.state(),
                opponent: &f.human,
                court: &f.court,
            };
            f.brain.on_ball_hit(Side::One, &f.bot, &view, &mut rng);
        }

        let dt = 1.0 / 120.0;
        let mut shot = None;
        for _ in 0..600 {
            ball.tick(dt);
            let view = AiView {
                ball: ball.state(),
                opponent: &f.human,
                court: &f.court,
            };
            if let Some(s) = f.brain.tick(dt, &mut f.bot, &view, &mut rng) {
                shot = Some(s);
                break;
            }
            f.bot.tick(dt);
        }

        let shot = shot.expect("AI should return the serve");
        // Hit back toward player one's half.
        assert!(shot.direction.z < 0.0);
        assert_eq!(f.brain.state(), AiState::RecoverPosition);
    }

    #[test]
    fn recovers_to_neutral_then_idles() {
        let mut f = fixture();
        let mut rng = test_rng();
        let ball = BallMotion::new(f.config.physics, Vec3::ZERO).unwrap();
        let view = AiView {
            ball: ball.state(),
            opponent: &f.human,
            court: &f.court,
        };
        f.bot.place(vec3(4.0, 0.0, 6.0));
        f.brain.state = AiState::RecoverPosition;

        for _ in 0..200 {
            f.brain.tick(1.0 / 60.0, &mut f.bot, &view, &mut rng);
            f.bot.tick(1.0 / 60.0);
            if f.brain.state() == AiState::Idle {
                break;
            }
        }
        assert_eq!(f.brain.state(), AiState::Idle);
        assert!(vec3::distance_xz(f.bot.position, f.court.baseline(Side::Two)) < 1.0);
    }

    #[test]
    fn lobs_over_a_net_rusher_from_deep() {
        let mut f = fixture();
        let mut rng = test_rng();
        f.human.place(vec3(0.0, 0.0, -2.0));
        f.bot.place(vec3(0.0, 0.0, 14.0));
        let (shot, hold) = f.brain.choose_shot(&f.bot, &f.human, &mut rng);
        assert_eq!(shot, ShotType::Lob);
        assert!((0.8..1.2).contains(&hold));
    }

    #[test]
    fn tired_player_hits_flat() {
        let mut f = fixture();
        let mut rng = test_rng();
        f.human.place(vec3(0.0, 0.0, -2.0));
        f.bot.place(vec3(0.0, 0.0, 3.0));
        f.bot.stamina.current = 10.0;
        for _ in 0..20 {
            let (shot, _) = f.brain.choose_shot(&f.bot, &f.human, &mut rng);
            assert_eq!(shot, ShotType::Flat);
        }
    }

    #[test]
    fn near_net_mostly_topspin() {
        let mut f = fixture();
        let mut rng = test_rng();
        f.bot.place(vec3(0.0, 0.0, 3.0));
        let topspins = (0..200)
            .filter(|_| f.brain.choose_shot(&f.bot, &f.human, &mut rng).0 == ShotType::Topspin)
            .count();
        assert!(topspins > 100 && topspins < 180, "got {} topspins", topspins);
    }

    #[test]
    fn aims_away_from_opponent_movement() {
        let mut f = fixture();
        let mut rng = test_rng();
        f.brain.config.shot_variation = 0.0;
        f.human.set_movement(vec3(1.0, 0.0, 0.0), false);
        f.human.tick(0.1);

        let ball = BallMotion::new(f.config.physics, Vec3::ZERO).unwrap();
        let view = AiView {
            ball: ball.state(),
            opponent: &f.human,
            court: &f.court,
        };
        let dir = f.brain.shot_direction(&f.bot, &view, &mut rng);
        assert!(dir.x < 0.0);
        assert!(dir.z < 0.0);
    }

    #[test]
    fn serves_after_delay() {
        let mut f = fixture();
        let mut rng = test_rng();
        let ball = BallMotion::new(f.config.physics, f.bot.serve_point()).unwrap();
        let view = AiView {
            ball: ball.state(),
            opponent: &f.human,
            court: &f.court,
        };
        f.brain.begin_serve(1.0);
        assert!(f.brain.is_serving());
        assert!(f.brain.tick(0.6, &mut f.bot, &view, &mut rng).is_none());

        let serve = f
            .brain
            .tick(0.6, &mut f.bot, &view, &mut rng)
            .expect("should serve");
        assert_eq!(serve.shot, ShotType::Flat);
        assert!(serve.direction.z < 0.0);
        assert!(!f.brain.is_serving());
    }
}
