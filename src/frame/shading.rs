//! CPU mirror of the shading math in `shader/lighting.wgsl` and
//! `shader/skybox.wgsl`.
//!
//! The renderer uploads [`LightingModel`] as-is; the free functions follow the
//! shader code line by line so the math can be checked without a GPU.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::settings::LightingSettings;

/// Constant terms of the lighting model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingModel {
    pub base_color: Vec4,
    pub ambient_color: Vec4,
    pub shininess: f32,
    pub specular_scale: f32,
    pub shadow_floor: f32,
}

impl LightingModel {
    pub fn from_settings(settings: &LightingSettings) -> Self {
        Self {
            base_color: settings.base_color,
            ambient_color: settings.ambient_color,
            shininess: settings.shininess,
            specular_scale: settings.specular_scale,
            shadow_floor: settings.shadow_floor,
        }
    }

    /// Color of a surface point given its shadow visibility.
    pub fn shade(
        &self,
        position: Vec3,
        normal: Vec3,
        light_position: Vec3,
        eye_position: Vec3,
        visibility: f32,
    ) -> Vec4 {
        let n = normal.normalize_or_zero();
        let l = (light_position - position).normalize_or_zero();
        let e = (eye_position - position).normalize_or_zero();
        let r = reflect(-l, n);

        let diffuse = l.dot(n).max(0.0) * visibility.max(self.shadow_floor);
        let specular =
            visibility * r.dot(e).max(0.0).powf(self.shininess) * self.specular_scale;

        let rgb = diffuse * self.base_color.truncate()
            + self.ambient_color.truncate()
            + Vec3::splat(specular);
        rgb.extend(self.base_color.w)
    }
}

impl Default for LightingModel {
    fn default() -> Self {
        Self::from_settings(&LightingSettings::default())
    }
}

/// Same as WGSL `reflect(i, n)`.
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Maps normalized device coordinates to shadow-map texture space.
///
/// x and y go from [-1,1] to [0,1] with y flipped for the top-left texture
/// origin. z is already [0,1] in wgpu clip space.
pub fn ndc_to_shadow_uv(ndc: Vec3) -> Vec3 {
    Vec3::new(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5, ndc.z)
}

/// Shadow-map coordinate of `point`, where `point` is in the space
/// `light_view_proj` expects. `None` if the point is behind the light.
pub fn shadow_coord(light_view_proj: Mat4, point: Vec3) -> Option<Vec3> {
    let clip = light_view_proj * point.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    Some(ndc_to_shadow_uv(clip.truncate() / clip.w))
}

/// Result of a `LessEqual` comparison sample with a single tap.
pub fn compare_depth(reference: f32, stored: f32) -> f32 {
    if reference <= stored {
        1.0
    } else {
        0.0
    }
}

/// World-space view direction of the skybox at a screen position.
pub fn skybox_direction(inverse_view_proj: Mat4, ndc: Vec2) -> Vec3 {
    let world = inverse_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    (world.truncate() / world.w).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners_map_to_texture_corners() {
        assert_eq!(ndc_to_shadow_uv(Vec3::new(-1.0, 1.0, 0.25)), Vec3::new(0.0, 0.0, 0.25));
        assert_eq!(ndc_to_shadow_uv(Vec3::new(1.0, -1.0, 0.75)), Vec3::new(1.0, 1.0, 0.75));
        assert_eq!(ndc_to_shadow_uv(Vec3::ZERO), Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn comparison_is_less_equal() {
        assert_eq!(compare_depth(0.4, 0.5), 1.0);
        assert_eq!(compare_depth(0.5, 0.5), 1.0);
        assert_eq!(compare_depth(0.5001, 0.5), 0.0);
    }

    #[test]
    fn fully_shadowed_surface_keeps_floor_and_ambient() {
        let model = LightingModel::default();
        let lit = model.shade(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, 1.0, 0.0), 1.0);
        let shadowed =
            model.shade(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 5.0, 0.0), Vec3::new(3.0, 1.0, 0.0), 0.0);

        let expected = model.shadow_floor * model.base_color.truncate()
            + model.ambient_color.truncate();
        assert!(shadowed.truncate().abs_diff_eq(expected, 1e-5));
        assert!(lit.x > shadowed.x);
        assert_eq!(shadowed.w, model.base_color.w);
    }

    #[test]
    fn specular_peaks_along_mirror_direction() {
        let model = LightingModel::default();
        let light = Vec3::new(-1.0, 1.0, 0.0) * 4.0;
        let mirror_eye = Vec3::new(1.0, 1.0, 0.0) * 4.0;
        let off_eye = Vec3::new(0.0, 1.0, 1.0) * 4.0;
        let on = model.shade(Vec3::ZERO, Vec3::Y, light, mirror_eye, 1.0);
        let off = model.shade(Vec3::ZERO, Vec3::Y, light, off_eye, 1.0);
        assert!((on.x - off.x - model.specular_scale).abs() < 1e-3);
    }

    #[test]
    fn surface_facing_away_gets_no_diffuse() {
        let model = LightingModel {
            ambient_color: Vec4::ZERO,
            ..LightingModel::default()
        };
        let color = model.shade(Vec3::ZERO, -Vec3::Y, Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -5.0, 0.0), 1.0);
        assert!(color.truncate().abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn point_behind_light_has_no_shadow_coord() {
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 10.0);
        assert!(shadow_coord(proj, Vec3::new(0.0, 0.0, 2.0)).is_none());
        assert!(shadow_coord(proj, Vec3::new(0.0, 0.0, -2.0)).is_some());
    }
}
