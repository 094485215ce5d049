use std::path::PathBuf;

use thiserror::Error;

use crate::asset::{CubemapError, MeshError};

/// Failures that stop the renderer from starting.
///
/// Every variant names the asset or GPU resource that failed so the host can
/// surface a useful diagnostic before the frame loop ever runs.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("mesh `{name}` is invalid: {source}")]
    Mesh {
        name: String,
        #[source]
        source: MeshError,
    },
    #[error("cubemap `{name}` is invalid: {source}")]
    Cubemap {
        name: String,
        #[source]
        source: CubemapError,
    },
    #[error("failed to create {resource}: {reason}")]
    Resource {
        resource: &'static str,
        reason: String,
    },
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}

impl SetupError {
    pub(crate) fn resource(resource: &'static str, reason: impl ToString) -> Self {
        Self::Resource {
            resource,
            reason: reason.to_string(),
        }
    }
}

/// Failures while recording or presenting a single frame.
///
/// None of these are fatal; the driver drops the frame and keeps scheduling.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface unavailable: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("{0} issued outside of a frame")]
    NoFrameInFlight(&'static str),
    #[error("object `{name}` references mesh {mesh} which was never uploaded")]
    MissingMesh { name: &'static str, mesh: usize },
    #[error("object {0} has no uniform binding")]
    MissingBinding(usize),
}

/// Why [`crate::run`] returned early.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_names_the_failed_resource() {
        let err = SetupError::resource("shadow pipeline", "shader validation failed");
        let message = err.to_string();
        assert!(message.contains("shadow pipeline"), "{message}");
        assert!(message.contains("shader validation failed"), "{message}");
    }

    #[test]
    fn mesh_error_is_reported_with_asset_name() {
        let err = SetupError::Mesh {
            name: "ship.json".into(),
            source: MeshError::Empty,
        };
        assert!(err.to_string().starts_with("mesh `ship.json` is invalid"));
    }
}
