use glam::{Quat, Vec3};

use crate::scene::transform::{euler_degrees, Transform};

/// Spin at fixed per-axis rates, in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub degrees_per_second: Vec3,
}

/// Circle in the XZ plane around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub center: Vec3,
    pub radius: f32,
    /// Radians per second.
    pub speed: f32,
}

/// Vertical sine offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bob {
    pub amplitude: f32,
    pub frequency: f32,
}

/// Closed-form animation of one object: the pose depends only on the
/// elapsed time, never on previous frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObjectAnimation {
    pub spin: Option<Spin>,
    pub orbit: Option<Orbit>,
    pub bob: Option<Bob>,
}

impl ObjectAnimation {
    pub fn sample(&self, rest: &Transform, time: f32) -> Transform {
        let mut transform = *rest;

        if let Some(orbit) = self.orbit {
            let angle = time * orbit.speed;
            transform.translation = orbit.center
                + Vec3::new(angle.cos() * orbit.radius, 0.0, angle.sin() * orbit.radius);
        }

        if let Some(bob) = self.bob {
            transform.translation.y += (time * bob.frequency).sin() * bob.amplitude;
        }

        if let Some(spin) = self.spin {
            let angles = spin.degrees_per_second * time;
            transform.rotation = euler_degrees(angles.x, angles.y, angles.z) * rest.rotation;
        }

        transform
    }
}

/// Rest rotation of the central model: a quarter turn about X.
pub fn upright() -> Quat {
    euler_degrees(90.0, 0.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_animation_returns_rest_pose() {
        let rest = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let animation = ObjectAnimation::default();
        assert_eq!(animation.sample(&rest, 12.5), rest);
    }

    #[test]
    fn bob_oscillates_around_rest_height() {
        let rest = Transform::default();
        let animation = ObjectAnimation {
            bob: Some(Bob {
                amplitude: 0.5,
                frequency: 1.0,
            }),
            ..Default::default()
        };
        let peak = animation.sample(&rest, std::f32::consts::FRAC_PI_2);
        assert!((peak.translation.y - 0.5).abs() < 1e-6);
        let trough = animation.sample(&rest, 3.0 * std::f32::consts::FRAC_PI_2);
        assert!((trough.translation.y + 0.5).abs() < 1e-5);
    }

    #[test]
    fn orbit_stays_on_circle() {
        let orbit = Orbit {
            center: Vec3::new(0.9, 0.9, 0.6),
            radius: 0.8,
            speed: 10.0,
        };
        let animation = ObjectAnimation {
            orbit: Some(orbit),
            ..Default::default()
        };
        for step in 0..50 {
            let t = animation.sample(&Transform::default(), step as f32 * 0.13);
            let offset = t.translation - orbit.center;
            assert!((offset.length() - 0.8).abs() < 1e-5);
            assert_eq!(offset.y, 0.0);
        }
    }

    #[test]
    fn spin_at_time_zero_keeps_rest_rotation() {
        let rest = Transform::from_trs(Vec3::ZERO, Quat::from_rotation_y(0.3), Vec3::ONE);
        let animation = ObjectAnimation {
            spin: Some(Spin {
                degrees_per_second: Vec3::new(80.0, 56.97, 0.0),
            }),
            ..Default::default()
        };
        assert!(animation
            .sample(&rest, 0.0)
            .rotation
            .abs_diff_eq(rest.rotation, 1e-6));
    }
}
