// renderer/uniforms.rs
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::frame::{LightingModel, ObjectMatrices};

/// Per-object transforms, shared by the shadow and lighting pipelines.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, PartialEq, Debug)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub model_view_proj: [[f32; 4]; 4],
    pub light_model_view_proj: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn new(matrices: &ObjectMatrices) -> Self {
        Self {
            model: matrices.model.to_cols_array_2d(),
            model_view_proj: matrices.model_view_proj.to_cols_array_2d(),
            light_model_view_proj: matrices.light_model_view_proj.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, PartialEq, Debug)]
pub struct LightingUniform {
    pub light_position: [f32; 4],
    pub eye_position: [f32; 4],
    pub base_color: [f32; 4],
    pub ambient_color: [f32; 4],
    /// shininess, specular scale, shadow floor, unused
    pub params: [f32; 4],
}

impl LightingUniform {
    pub fn new(model: &LightingModel, light_position: Vec3, eye_position: Vec3) -> Self {
        Self {
            light_position: light_position.extend(1.0).to_array(),
            eye_position: eye_position.extend(1.0).to_array(),
            base_color: model.base_color.to_array(),
            ambient_color: model.ambient_color.to_array(),
            params: [
                model.shininess,
                model.specular_scale,
                model.shadow_floor,
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, PartialEq, Debug)]
pub struct SkyboxUniform {
    pub inverse_view_proj: [[f32; 4]; 4],
}

impl SkyboxUniform {
    pub fn new(inverse_view_proj: Mat4) -> Self {
        Self {
            inverse_view_proj: inverse_view_proj.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_uniform_is_192_bytes() {
        // 3 * mat4x4<f32>
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 192);
    }

    #[test]
    fn lighting_uniform_is_80_bytes() {
        assert_eq!(std::mem::size_of::<LightingUniform>(), 80);
    }

    #[test]
    fn skybox_uniform_is_64_bytes() {
        assert_eq!(std::mem::size_of::<SkyboxUniform>(), 64);
    }

    #[test]
    fn lighting_params_follow_model() {
        let model = LightingModel::default();
        let uniform = LightingUniform::new(&model, Vec3::new(5.0, 5.0, 3.5), Vec3::ZERO);
        assert_eq!(
            uniform.params,
            [model.shininess, model.specular_scale, model.shadow_floor, 0.0]
        );
        assert_eq!(uniform.light_position, [5.0, 5.0, 3.5, 1.0]);
    }
}
