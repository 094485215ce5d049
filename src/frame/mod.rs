// frame/mod.rs

pub mod driver;
pub mod matrices;
pub mod plan;
pub mod shading;

pub use driver::{DriverState, FrameBackend, FrameDriver, FrameOutcome, FrameScheduler, PassMode};
pub use matrices::{skybox_view_proj_inverse, FrameMatrices, ObjectMatrices};
pub use plan::{DepthState, FramePlan, PassDescriptor, PassKind, PassTarget, PlanError};
pub use shading::LightingModel;

use crate::scene::SceneState;

/// Everything a pass needs to record one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    pub time: f32,
    pub scene: SceneState,
    pub matrices: FrameMatrices,
}

impl FrameContext {
    pub fn new(scene: SceneState, aspect: f32) -> Self {
        let matrices = FrameMatrices::compute(&scene, aspect);
        Self {
            time: scene.time,
            scene,
            matrices,
        }
    }
}
