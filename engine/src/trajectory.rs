//! Closed-form ballistic prediction under constant gravity, no drag.
//!
//! The ground is the plane y = 0; callers working above a raised floor shift
//! their heights first. A trajectory that never reaches the ground yields `None`.

use crate::error::{EngineError, Result};
use tennis_shared::vec3::Vec3;

/// Smallest gravity accepted; below this the time solve is ill-conditioned.
const MIN_GRAVITY: f64 = 1e-6;

/// Validated gravity: finite and strictly positive, acting in -y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity(f64);

impl Gravity {
    pub fn new(g: f64) -> Result<Self> {
        if !g.is_finite() {
            return Err(EngineError::InvalidPhysicsInput(format!(
                "gravity must be finite, got {}",
                g
            )));
        }
        if g < MIN_GRAVITY {
            return Err(EngineError::InvalidPhysicsInput(format!(
                "gravity must be > {}, got {}",
                MIN_GRAVITY, g
            )));
        }
        Ok(Self(g))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Time until y reaches 0, solving -0.5*g*t^2 + vy*t + y0 = 0.
/// Returns the earliest strictly positive root.
pub fn time_to_ground(pos: Vec3, vel: Vec3, gravity: Gravity) -> Option<f64> {
    let a = -0.5 * gravity.0;
    let b = vel.y;
    let c = pos.y;

    let discriminant = b * b - 4.0 * a * c;
    if !(discriminant >= 0.0) {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let t2 = (-b - sqrt_disc) / (2.0 * a);

    match (t1 > 0.0, t2 > 0.0) {
        (true, true) => Some(t1.min(t2)),
        (true, false) => Some(t1),
        (false, true) => Some(t2),
        (false, false) => None,
    }
}

/// x(t) = x0 + vx*t, y(t) = y0 + vy*t - g*t^2/2, z(t) = z0 + vz*t
pub fn position_at_time(pos: Vec3, vel: Vec3, t: f64, gravity: Gravity) -> Vec3 {
    Vec3::new(
        pos.x + vel.x * t,
        pos.y + vel.y * t - 0.5 * gravity.0 * t * t,
        pos.z + vel.z * t,
    )
}

pub fn velocity_at_time(vel: Vec3, t: f64, gravity: Gravity) -> Vec3 {
    Vec3::new(vel.x, vel.y - gravity.0 * t, vel.z)
}

/// First ground contact, with y pinned to 0.
pub fn predict_landing(pos: Vec3, vel: Vec3, gravity: Gravity) -> Option<Vec3> {
    let t = time_to_ground(pos, vel, gravity)?;
    let mut landing = position_at_time(pos, vel, t, gravity);
    landing.y = 0.0;
    Some(landing)
}

/// Second ground contact after one bounce with `vy_after = -restitution * vy_before`.
pub fn predict_bounce_landing(
    pos: Vec3,
    vel: Vec3,
    restitution: f64,
    gravity: Gravity,
) -> Option<Vec3> {
    let t_first = time_to_ground(pos, vel, gravity)?;
    let mut first = position_at_time(pos, vel, t_first, gravity);
    first.y = 0.0;

    let mut bounced = velocity_at_time(vel, t_first, gravity);
    bounced.y = -restitution * bounced.y;

    let t_second = time_to_ground(first, bounced, gravity)?;
    let mut second = position_at_time(first, bounced, t_second, gravity);
    second.y = 0.0;
    Some(second)
}

/// Evenly spaced points from launch to first ground contact (inclusive).
/// Empty when the ball never lands.
pub fn sample_arc(pos: Vec3, vel: Vec3, gravity: Gravity, samples: usize) -> Vec<Vec3> {
    let Some(t_land) = time_to_ground(pos, vel, gravity) else {
        return Vec::new();
    };
    let count = samples.max(2);
    (0..count)
        .map(|i| {
            let t = t_land * i as f64 / (count - 1) as f64;
            position_at_time(pos, vel, t, gravity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tennis_shared::vec3::vec3;

    const G: f64 = 9.81;

    fn g() -> Gravity {
        Gravity::new(G).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "Expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn gravity_rejects_zero_negative_and_nan() {
        assert!(matches!(
            Gravity::new(0.0),
            Err(EngineError::InvalidPhysicsInput(_))
        ));
        assert!(Gravity::new(-9.81).is_err());
        assert!(Gravity::new(f64::NAN).is_err());
        assert!(Gravity::new(f64::INFINITY).is_err());
        assert!(Gravity::new(1e-9).is_err());
    }

    #[test]
    fn horizontal_launch_lands_after_sqrt_2h_over_g() {
        let h = 4.0;
        let t = time_to_ground(vec3(0.0, h, 0.0), vec3(3.0, 0.0, 0.0), g()).unwrap();
        assert_close(t, (2.0 * h / G).sqrt());

        let landing = predict_landing(vec3(0.0, h, 0.0), vec3(3.0, 0.0, 0.0), g()).unwrap();
        assert_close(landing.x, 3.0 * (2.0 * h / G).sqrt());
        assert_eq!(landing.y, 0.0);
    }

    #[test]
    fn time_to_ground_matches_quadratic_substitution() {
        let pos = vec3(0.0, 1.5, 0.0);
        let vel = vec3(2.0, 6.0, -1.0);
        let t = time_to_ground(pos, vel, g()).unwrap();
        assert_close(pos.y + vel.y * t - 0.5 * G * t * t, 0.0);
        assert!(t > 0.0);
    }

    #[test]
    fn both_roots_positive_takes_smaller() {
        // Below ground and rising: crosses y=0 on the way up, then again on the way down.
        let pos = vec3(0.0, -1.0, 0.0);
        let vel = vec3(0.0, 10.0, 0.0);
        let t = time_to_ground(pos, vel, g()).unwrap();
        let disc: f64 = 100.0 - 2.0 * G;
        let smaller = (10.0 - disc.sqrt()) / G;
        let larger = (10.0 + disc.sqrt()) / G;
        assert_close(t, smaller);
        assert!(t < larger);
    }

    #[test]
    fn unreachable_ground_is_none() {
        // Below ground, falling: the parabola's apex never reaches y=0.
        assert!(time_to_ground(vec3(0.0, -5.0, 0.0), vec3(0.0, 1.0, 0.0), g()).is_none());
        assert!(predict_landing(vec3(0.0, -5.0, 0.0), vec3(0.0, 1.0, 0.0), g()).is_none());
    }

    #[test]
    fn resting_on_ground_is_none() {
        assert!(time_to_ground(Vec3::ZERO, Vec3::ZERO, g()).is_none());
    }

    #[test]
    fn launch_from_ground_lands_at_flight_time() {
        let t = time_to_ground(Vec3::ZERO, vec3(0.0, 10.0, 0.0), g()).unwrap();
        assert_close(t, 20.0 / G);
    }

    #[test]
    fn non_finite_input_is_none() {
        assert!(time_to_ground(vec3(0.0, f64::NAN, 0.0), Vec3::ZERO, g()).is_none());
    }

    #[test]
    fn position_and_velocity_follow_kinematics() {
        let pos = vec3(1.0, 2.0, 3.0);
        let vel = vec3(4.0, 5.0, 6.0);
        let p = position_at_time(pos, vel, 0.5, g());
        assert_close(p.x, 3.0);
        assert_close(p.y, 2.0 + 2.5 - 0.125 * G);
        assert_close(p.z, 6.0);

        let v = velocity_at_time(vel, 0.5, g());
        assert_eq!((v.x, v.z), (4.0, 6.0));
        assert_close(v.y, 5.0 - 0.5 * G);
    }

    #[test]
    fn elastic_bounce_from_flat_launch_lands_on_ground_twice() {
        let pos = Vec3::ZERO;
        let vel = vec3(2.0, 5.0, 1.0);
        let first = predict_landing(pos, vel, g()).unwrap();
        let second = predict_bounce_landing(pos, vel, 1.0, g()).unwrap();
        assert_eq!(first.y, 0.0);
        assert_eq!(second.y, 0.0);
        // Elastic bounce repeats the same arc.
        assert_close(second.x, 2.0 * first.x);
        assert_close(second.z, 2.0 * first.z);
    }

    #[test]
    fn bounce_with_restitution_shortens_second_arc() {
        let pos = vec3(0.0, 1.0, 0.0);
        let vel = vec3(0.0, 3.0, 10.0);
        let first = predict_landing(pos, vel, g()).unwrap();
        let second = predict_bounce_landing(pos, vel, 0.5, g()).unwrap();

        let v_impact = velocity_at_time(vel, time_to_ground(pos, vel, g()).unwrap(), g());
        let second_flight = 2.0 * 0.5 * -v_impact.y / G;
        assert_close(second.z - first.z, 10.0 * second_flight);
    }

    #[test]
    fn dead_bounce_has_no_second_contact() {
        assert!(predict_bounce_landing(vec3(0.0, 2.0, 0.0), vec3(1.0, 0.0, 0.0), 0.0, g()).is_none());
    }

    #[test]
    fn sampled_arc_spans_launch_to_landing() {
        let pos = vec3(0.0, 1.0, 0.0);
        let vel = vec3(0.0, 4.0, 6.0);
        let arc = sample_arc(pos, vel, g(), 10);
        assert_eq!(arc.len(), 10);
        assert_eq!(arc[0], pos);
        assert_close(arc[9].y, 0.0);
        assert_close(arc[9].z, predict_landing(pos, vel, g()).unwrap().z);
    }

    #[test]
    fn sampled_arc_is_empty_when_never_landing() {
        assert!(sample_arc(vec3(0.0, -3.0, 0.0), Vec3::ZERO, g(), 5).is_empty());
    }
}
