use glam::{Mat4, Vec3};

use crate::settings::LightSettings;

/// The single shadow-casting light, treated as a square-aspect camera.
///
/// Geometry outside this frustum is clipped from the shadow map and casts no
/// shadow; nothing widens the frustum to fit the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Light {
    pub fn from_settings(settings: &LightSettings) -> Self {
        Self {
            position: settings.position,
            target: settings.target,
            up: shadow_up(settings.target - settings.position, settings.up),
            fov_y_radians: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, 1.0, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::from_settings(&LightSettings::default())
    }
}

/// Swaps the up vector when it is nearly parallel to the view direction.
fn shadow_up(direction: Vec3, up: Vec3) -> Vec3 {
    let direction = direction.normalize_or_zero();
    let up = up.normalize_or_zero();
    if up == Vec3::ZERO || direction.dot(up).abs() > 0.95 {
        if direction.dot(Vec3::Z).abs() > 0.95 {
            Vec3::Y
        } else {
            Vec3::Z
        }
    } else {
        up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn light_target_projects_to_clip_center() {
        let light = Light::default();
        let clip = light.view_proj() * light.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < EPS && ndc.y.abs() < EPS, "{ndc:?}");
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn depth_maps_into_wgpu_range() {
        let light = Light::default();
        let forward = (light.target - light.position).normalize();
        let near = light.view_proj() * (light.position + forward * light.near).extend(1.0);
        let far = light.view_proj() * (light.position + forward * light.far).extend(1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn straight_down_light_gets_a_usable_up_vector() {
        let settings = LightSettings {
            position: Vec3::new(0.0, 10.0, 0.0),
            ..LightSettings::default()
        };
        let light = Light::from_settings(&settings);
        assert_eq!(light.up, Vec3::Z);
        assert!(light.view().is_finite());
    }
}
