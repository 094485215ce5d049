use glam::{Mat4, Vec3};

use crate::settings::CameraSettings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera on its orbit after `time` seconds.
    pub fn orbiting(settings: &CameraSettings, time: f32) -> Self {
        let eye = settings.orbit_eye(time * settings.orbit_speed);
        Self {
            eye,
            target: settings.target,
            up: view_up(settings.target - eye, settings.up),
            fov_y_radians: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View matrix with the translation column zeroed; only orientation remains.
    pub fn rotation_view(&self) -> Mat4 {
        let mut view = self.view();
        view.w_axis = glam::Vec4::W;
        view
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }

    pub fn position(&self) -> Vec3 {
        self.eye
    }
}

/// `up` unless it is zero or exactly parallel to the view direction, where
/// `look_at_rh` would produce NaNs.
fn view_up(direction: Vec3, up: Vec3) -> Vec3 {
    let up = up.normalize_or_zero();
    if direction.cross(up).length_squared() > 1e-12 {
        return up;
    }
    if direction.cross(Vec3::Y).length_squared() > 1e-12 {
        Vec3::Y
    } else {
        Vec3::Z
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::orbiting(&CameraSettings::default(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_proj_is_reasonable() {
        let cam = Camera::default();
        let vp = cam.view_proj(16.0 / 9.0);
        let id = vp * vp.inverse();
        assert!(id.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn up_along_view_direction_keeps_view_finite() {
        let settings = CameraSettings {
            orbit_radius_x: 0.0,
            orbit_radius_z: 0.0,
            ..CameraSettings::default()
        };
        let cam = Camera::orbiting(&settings, 1.0);
        assert_eq!(cam.up, Vec3::Z);
        assert!(cam.view().is_finite());

        let zero_up = CameraSettings {
            up: Vec3::ZERO,
            ..CameraSettings::default()
        };
        assert!(Camera::orbiting(&zero_up, 2.0).view_proj(1.5).is_finite());
    }

    #[test]
    fn orbit_starts_on_positive_z() {
        let cam = Camera::orbiting(&CameraSettings::default(), 0.0);
        assert!(cam.eye.abs_diff_eq(Vec3::new(0.0, 6.0, 6.0), 1e-6));
    }

    #[test]
    fn orbit_keeps_height_and_stays_within_radii() {
        let settings = CameraSettings::default();
        for step in 0..100 {
            let cam = Camera::orbiting(&settings, step as f32 * 3.7);
            assert_eq!(cam.eye.y, settings.height);
            assert!(cam.eye.x.abs() <= settings.orbit_radius_x + 1e-5);
            assert!(cam.eye.z.abs() <= settings.orbit_radius_z + 1e-5);
        }
    }

    #[test]
    fn rotation_view_drops_only_translation() {
        let cam = Camera::default();
        let full = cam.view();
        let rotation = cam.rotation_view();
        assert_eq!(rotation.x_axis, full.x_axis);
        assert_eq!(rotation.y_axis, full.y_axis);
        assert_eq!(rotation.z_axis, full.z_axis);
        assert_eq!(rotation.transform_point3(Vec3::ZERO), Vec3::ZERO);
    }
}
