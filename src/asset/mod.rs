pub mod cubemap;
pub mod mesh;
pub mod primitives;

pub use cubemap::{CubeFace, CubemapData, CubemapError, FaceFiles};
pub use mesh::{MeshData, MeshError};

use crate::error::SetupError;
use crate::settings::RenderSettings;

/// Identifies one of the fixed meshes every scene is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    /// The configured model, or a cube when no model file is set.
    Model,
    Cube,
    Plane,
}

impl MeshId {
    pub const ALL: [MeshId; 3] = [MeshId::Model, MeshId::Cube, MeshId::Plane];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of the GPU buffers holding this mesh, used in setup errors.
    pub fn resource(self) -> &'static str {
        match self {
            MeshId::Model => "model mesh buffers",
            MeshId::Cube => "cube mesh buffers",
            MeshId::Plane => "plane mesh buffers",
        }
    }
}

/// Everything the renderer uploads once at startup.
///
/// Holding a `SceneAssets` means every mesh and cubemap face decoded and
/// validated; construction is the readiness gate for the frame loop.
pub struct SceneAssets {
    meshes: [MeshData; 3],
    skybox: CubemapData,
}

impl SceneAssets {
    pub fn new(model: MeshData, ground_size: f32, skybox: CubemapData) -> Self {
        Self {
            meshes: [model, primitives::cube(), primitives::plane(ground_size)],
            skybox,
        }
    }

    pub fn load(settings: &RenderSettings) -> Result<Self, SetupError> {
        let assets = &settings.assets;
        let model = match &assets.model_path {
            Some(path) => MeshData::load(path)?,
            None => {
                log::info!("No model configured, using the built-in cube");
                primitives::cube()
            }
        };
        let skybox = CubemapData::load_dir(&assets.skybox_dir, &assets.skybox_faces)?;

        log::info!(
            "Scene assets ready: model with {} vertices, {}px skybox",
            model.vertex_count(),
            skybox.size()
        );

        Ok(Self::new(model, settings.scene.ground_size, skybox))
    }

    pub fn mesh(&self, id: MeshId) -> &MeshData {
        &self.meshes[id.index()]
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &MeshData)> {
        MeshId::ALL.into_iter().map(move |id| (id, self.mesh(id)))
    }

    pub fn skybox(&self) -> &CubemapData {
        &self.skybox
    }
}
