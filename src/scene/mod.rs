// scene/mod.rs

pub mod animation;
pub mod camera;
pub mod light;
pub mod state;
pub mod transform;

pub use animation::ObjectAnimation;
pub use camera::Camera;
pub use light::Light;
pub use state::{ObjectDescription, SceneDescription, SceneObject, SceneState};
pub use transform::Transform;
