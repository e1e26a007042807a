//! Shot presets. Every shot type reduces to (speed, launch angle, spin) and
//! goes through the same launch routine.

use tennis_shared::config::ShotConfig;
use tennis_shared::events::ShotType;
use tennis_shared::vec3::{self, Vec3};

/// A shot request from a player or the AI.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotCommand {
    pub shot: ShotType,
    /// Aim direction; only its horizontal components are used.
    pub direction: Vec3,
    /// How long the shot button was held (seconds). Ignored by flat and slice.
    #[serde(default)]
    pub hold_time: f64,
}

/// Resolved launch parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotParams {
    pub speed: f64,
    /// Launch angle in degrees
    pub angle: f64,
    /// Spin about the x axis
    pub spin: f64,
}

/// Impulse and spin handed to the ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotLaunch {
    pub impulse: Vec3,
    pub spin: Vec3,
}

/// Hold time mapped onto [0, 1] against the configured maximum.
pub fn power_fraction(hold_time: f64, config: &ShotConfig) -> f64 {
    if !hold_time.is_finite() {
        return 0.0;
    }
    (hold_time / config.max_hold_time).clamp(0.0, 1.0)
}

pub fn shot_params(shot: ShotType, hold_time: f64, config: &ShotConfig) -> ShotParams {
    match shot {
        ShotType::Flat => ShotParams {
            speed: config.flat_speed,
            angle: config.flat_angle,
            spin: 0.0,
        },
        ShotType::Topspin => {
            let power = power_fraction(hold_time, config);
            ShotParams {
                speed: config.topspin_base_speed + power * config.power_speed_bonus,
                angle: config.topspin_angle,
                spin: config.topspin_spin * power,
            }
        }
        ShotType::Slice => ShotParams {
            speed: config.slice_speed,
            angle: config.slice_angle,
            spin: config.slice_spin,
        },
        ShotType::Lob => {
            let power = power_fraction(hold_time, config);
            ShotParams {
                speed: config.lob_base_speed + power * config.power_speed_bonus,
                angle: config.lob_angle + power * config.lob_power_angle_bonus,
                spin: 0.0,
            }
        }
    }
}

/// Shared launch routine: keep the aim's horizontal components, replace the
/// vertical with sin(angle), normalize and scale by speed.
pub fn launch(direction: Vec3, params: ShotParams) -> ShotLaunch {
    let aim = vec3::try_normalize(vec3::horizontal(direction)).unwrap_or(Vec3::FORWARD);
    let lift = params.angle.to_radians().sin();
    let adjusted = vec3::normalize(Vec3::new(aim.x, lift, aim.z));
    ShotLaunch {
        impulse: vec3::scale(adjusted, params.speed),
        spin: Vec3::new(params.spin, 0.0, 0.0),
    }
}

impl ShotCommand {
    pub fn new(shot: ShotType, direction: Vec3, hold_time: f64) -> Self {
        Self {
            shot,
            direction,
            hold_time,
        }
    }

    pub fn resolve(&self, config: &ShotConfig) -> ShotLaunch {
        launch(self.direction, shot_params(self.shot, self.hold_time, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tennis_shared::vec3::{length, vec3};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "Expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn power_is_clamped_to_unit_range() {
        let config = ShotConfig::default();
        assert_eq!(power_fraction(-1.0, &config), 0.0);
        assert_eq!(power_fraction(1.0, &config), 0.5);
        assert_eq!(power_fraction(10.0, &config), 1.0);
        assert_eq!(power_fraction(f64::NAN, &config), 0.0);
    }

    #[test]
    fn flat_and_slice_ignore_hold_time() {
        let config = ShotConfig::default();
        assert_eq!(
            shot_params(ShotType::Flat, 0.0, &config),
            shot_params(ShotType::Flat, 2.0, &config)
        );
        let slice = shot_params(ShotType::Slice, 2.0, &config);
        assert_eq!(slice.speed, 12.0);
        assert_eq!(slice.angle, 10.0);
        assert_eq!(slice.spin, -300.0);
    }

    #[test]
    fn topspin_scales_speed_and_spin_with_power() {
        let config = ShotConfig::default();
        let half = shot_params(ShotType::Topspin, 1.0, &config);
        assert_close(half.speed, 17.5);
        assert_close(half.spin, 250.0);
        assert_eq!(half.angle, 15.0);

        let full = shot_params(ShotType::Topspin, 5.0, &config);
        assert_close(full.speed, 20.0);
        assert_close(full.spin, 500.0);
    }

    #[test]
    fn lob_scales_speed_and_angle_with_power() {
        let config = ShotConfig::default();
        let none = shot_params(ShotType::Lob, 0.0, &config);
        assert_eq!((none.speed, none.angle), (10.0, 45.0));

        let full = shot_params(ShotType::Lob, 2.0, &config);
        assert_close(full.speed, 15.0);
        assert_close(full.angle, 55.0);
    }

    #[test]
    fn launch_has_requested_speed() {
        let params = ShotParams {
            speed: 20.0,
            angle: 5.0,
            spin: 0.0,
        };
        let launch = launch(vec3(3.0, 7.0, 4.0), params);
        assert_close(length(launch.impulse), 20.0);
        assert!(launch.impulse.y > 0.0);
        // Horizontal heading preserved, vertical aim discarded.
        assert_close(launch.impulse.x / launch.impulse.z, 0.75);
    }

    #[test]
    fn steeper_angle_launches_higher() {
        let config = ShotConfig::default();
        let flat = ShotCommand::new(ShotType::Flat, Vec3::FORWARD, 0.0).resolve(&config);
        let lob = ShotCommand::new(ShotType::Lob, Vec3::FORWARD, 0.0).resolve(&config);
        let flat_ratio = flat.impulse.y / length(flat.impulse);
        let lob_ratio = lob.impulse.y / length(lob.impulse);
        assert!(lob_ratio > flat_ratio);
    }

    #[test]
    fn zero_aim_defaults_forward() {
        let config = ShotConfig::default();
        let launch = ShotCommand::new(ShotType::Flat, Vec3::ZERO, 0.0).resolve(&config);
        assert!(launch.impulse.z > 0.0);
        assert_close(launch.impulse.x, 0.0);
    }

    #[test]
    fn spin_is_about_x_axis() {
        let config = ShotConfig::default();
        let launch = ShotCommand::new(ShotType::Slice, Vec3::FORWARD, 0.0).resolve(&config);
        assert_eq!(launch.spin, vec3(-300.0, 0.0, 0.0));
    }
}
