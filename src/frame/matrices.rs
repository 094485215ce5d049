use glam::Mat4;

use crate::scene::SceneState;

/// Per-object matrices consumed by the shadow and lighting passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectMatrices {
    pub model: Mat4,
    pub model_view_proj: Mat4,
    pub light_model_view_proj: Mat4,
}

/// All matrices of one frame, derived from the scene state alone.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMatrices {
    pub projection: Mat4,
    pub view: Mat4,
    pub view_proj: Mat4,
    pub light_view_proj: Mat4,
    /// `None` when the rotation-only view-projection cannot be inverted.
    pub skybox_inverse: Option<Mat4>,
    pub objects: Vec<ObjectMatrices>,
}

impl FrameMatrices {
    pub fn compute(scene: &SceneState, aspect: f32) -> Self {
        let projection = scene.camera.proj(aspect);
        let view = scene.camera.view();
        let view_proj = projection * view;
        let light_view_proj = scene.light.view_proj();

        let objects = scene
            .objects
            .iter()
            .map(|object| {
                let model = object.model();
                ObjectMatrices {
                    model,
                    model_view_proj: view_proj * model,
                    light_model_view_proj: light_view_proj * model,
                }
            })
            .collect();

        Self {
            projection,
            view,
            view_proj,
            light_view_proj,
            skybox_inverse: skybox_view_proj_inverse(projection, scene.camera.rotation_view()),
            objects,
        }
    }
}

/// Inverse of `projection × rotation_view`, or `None` if it is singular or
/// not finite.
///
/// `rotation_view` must already have its translation removed, otherwise the
/// background follows world position instead of staying centred on the eye.
pub fn skybox_view_proj_inverse(projection: Mat4, rotation_view: Mat4) -> Option<Mat4> {
    let view_proj = projection * rotation_view;
    let det = view_proj.determinant();
    if !det.is_finite() || det.abs() <= f32::MIN_POSITIVE {
        return None;
    }
    let inverse = view_proj.inverse();
    inverse.is_finite().then_some(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneDescription;
    use crate::settings::RenderSettings;

    #[test]
    fn view_proj_is_projection_times_view() {
        let scene = SceneDescription::from_settings(&RenderSettings::default()).state_at(2.0);
        let m = FrameMatrices::compute(&scene, 1.5);
        assert_eq!(m.view_proj, m.projection * m.view);
        assert_eq!(m.light_view_proj, scene.light.proj() * scene.light.view());
    }

    #[test]
    fn object_matrices_chain_model_into_both_views() {
        let scene = SceneDescription::from_settings(&RenderSettings::default()).state_at(0.7);
        let m = FrameMatrices::compute(&scene, 1.0);
        assert_eq!(m.objects.len(), scene.objects.len());
        for (object, matrices) in scene.objects.iter().zip(&m.objects) {
            assert_eq!(matrices.model, object.model());
            assert_eq!(matrices.model_view_proj, m.view_proj * matrices.model);
            assert_eq!(matrices.light_model_view_proj, m.light_view_proj * matrices.model);
        }
    }

    #[test]
    fn singular_projection_has_no_skybox_inverse() {
        let degenerate = Mat4::ZERO;
        assert!(skybox_view_proj_inverse(degenerate, Mat4::IDENTITY).is_none());

        let nan = Mat4::from_cols_array(&[f32::NAN; 16]);
        assert!(skybox_view_proj_inverse(nan, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn regular_camera_has_skybox_inverse() {
        let scene = SceneDescription::from_settings(&RenderSettings::default()).state_at(0.0);
        let m = FrameMatrices::compute(&scene, 16.0 / 9.0);
        let inverse = m.skybox_inverse.unwrap();
        let round_trip = inverse * (m.projection * scene.camera.rotation_view());
        assert!(round_trip.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }
}
