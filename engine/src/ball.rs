//! Fixed-step ball integration with floor bounces and net reflection.

use crate::error::{EngineError, Result};
use tennis_shared::config::PhysicsConfig;
use tennis_shared::events::PlayerTag;
use tennis_shared::vec3::{self, Vec3};

/// Ball kinematic state. Owned by [`BallMotion`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Angular velocity set by the last shot; carried for display only.
    pub spin: Vec3,
    pub launched: bool,
    /// Settled on the floor; further floor contacts are silent.
    pub resting: bool,
}

/// Floor contact, carrying the post-bounce velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// A shot was applied to the ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerHit {
    pub position: Vec3,
    pub velocity: Vec3,
    pub player: PlayerTag,
}

/// Ball motion simulator.
pub struct BallMotion {
    config: PhysicsConfig,
    state: BallState,
}

impl BallMotion {
    pub fn new(config: PhysicsConfig, position: Vec3) -> Result<Self> {
        config.validate().map_err(EngineError::InvalidPhysicsInput)?;
        Ok(Self {
            config,
            state: BallState {
                position,
                velocity: Vec3::ZERO,
                spin: Vec3::ZERO,
                launched: false,
                resting: false,
            },
        })
    }

    pub fn state(&self) -> &BallState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Hold the ball still at `position` until the next shot.
    pub fn hold_at(&mut self, position: Vec3) {
        self.state = BallState {
            position,
            velocity: Vec3::ZERO,
            spin: Vec3::ZERO,
            launched: false,
            resting: false,
        };
    }

    /// Host-side positional correction (e.g. pushing the ball off the net).
    pub fn set_position(&mut self, position: Vec3) {
        self.state.position = position;
    }

    /// Advance one fixed step. Returns the floor contact if one happened.
    pub fn tick(&mut self, dt: f64) -> Option<GroundHit> {
        if !self.state.launched {
            return None;
        }

        let ball = &mut self.state;
        ball.velocity.y -= self.config.gravity * dt;

        let mut next = vec3::add(ball.position, vec3::scale(ball.velocity, dt));
        let floor = self.config.floor_height();
        if next.y > floor {
            ball.position = next;
            ball.resting = false;
            return None;
        }

        next.y = floor;
        ball.position = next;
        ball.velocity.x *= self.config.friction_factor;
        ball.velocity.z *= self.config.friction_factor;

        if ball.resting {
            ball.velocity.y = 0.0;
            return None;
        }

        ball.velocity.y = -ball.velocity.y * self.config.ground_restitution;
        if ball.velocity.y < self.config.rest_speed {
            ball.velocity.y = 0.0;
            ball.resting = true;
        }

        Some(GroundHit {
            position: ball.position,
            velocity: ball.velocity,
        })
    }

    /// Reflect off tagged geometry about the averaged contact normal and
    /// scale by the net restitution. Position is left to the host.
    /// Returns false when the normals cancel out or none were given.
    pub fn resolve_net_contact(&mut self, normals: &[Vec3]) -> bool {
        let sum = normals.iter().fold(Vec3::ZERO, |acc, n| vec3::add(acc, *n));
        let Some(normal) = vec3::try_normalize(sum) else {
            tracing::warn!("Ignoring net contact with degenerate normals");
            return false;
        };
        let reflected = vec3::reflect(self.state.velocity, normal);
        self.state.velocity = vec3::scale(reflected, self.config.net_restitution);
        self.state.resting = false;
        true
    }

    /// Strike the ball: velocity becomes impulse / mass.
    pub fn apply_shot(&mut self, impulse: Vec3, spin: Vec3, player: PlayerTag) -> PlayerHit {
        let ball = &mut self.state;
        ball.velocity = vec3::scale(impulse, 1.0 / self.config.ball_mass);
        ball.spin = spin;
        ball.launched = true;
        ball.resting = false;
        PlayerHit {
            position: ball.position,
            velocity: ball.velocity,
            player,
        }
    }
}
