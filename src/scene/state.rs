use glam::{Mat4, Quat, Vec3};

use crate::asset::MeshId;
use crate::scene::animation::{upright, Bob, ObjectAnimation, Orbit, Spin};
use crate::scene::{Camera, Light, Transform};
use crate::settings::{CameraSettings, RenderSettings};

/// Static description of one drawable: which mesh, where it rests, how it moves.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescription {
    pub name: &'static str,
    pub mesh: MeshId,
    pub rest: Transform,
    /// Fixed orientation applied after the animated transform.
    pub basis: Quat,
    pub animation: ObjectAnimation,
    pub casts_shadows: bool,
}

/// Everything that stays fixed while the frame loop runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub camera: CameraSettings,
    pub light: Light,
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let mut objects = vec![ObjectDescription {
            name: "model",
            mesh: MeshId::Model,
            rest: Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(0.8)),
            basis: upright(),
            animation: ObjectAnimation {
                spin: Some(Spin {
                    degrees_per_second: Vec3::new(80.0, 56.97, 0.0),
                }),
                bob: Some(Bob {
                    amplitude: 0.5,
                    frequency: 1.0,
                }),
                orbit: None,
            },
            casts_shadows: true,
        }];

        if settings.scene.orbiter {
            objects.push(ObjectDescription {
                name: "orbiter",
                mesh: MeshId::Cube,
                rest: Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(0.22)),
                basis: Quat::IDENTITY,
                animation: ObjectAnimation {
                    spin: Some(Spin {
                        degrees_per_second: Vec3::new(25.0, 17.0, 0.0),
                    }),
                    orbit: Some(Orbit {
                        center: Vec3::new(0.9, 0.9, 0.6),
                        radius: 0.8,
                        speed: 10.0,
                    }),
                    bob: None,
                },
                casts_shadows: true,
            });
        }

        if settings.scene.ground {
            objects.push(ObjectDescription {
                name: "ground",
                mesh: MeshId::Plane,
                rest: Transform::from_translation(Vec3::new(0.0, settings.scene.ground_height, 0.0)),
                basis: Quat::IDENTITY,
                animation: ObjectAnimation::default(),
                casts_shadows: false,
            });
        }

        Self {
            camera: settings.camera.clone(),
            light: Light::from_settings(&settings.light),
            objects,
        }
    }

    pub fn state_at(&self, time: f32) -> SceneState {
        SceneState {
            time,
            camera: Camera::orbiting(&self.camera, time),
            light: self.light,
            objects: self
                .objects
                .iter()
                .map(|object| SceneObject {
                    name: object.name,
                    mesh: object.mesh,
                    transform: object.animation.sample(&object.rest, time),
                    basis: object.basis,
                    casts_shadows: object.casts_shadows,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: &'static str,
    pub mesh: MeshId,
    pub transform: Transform,
    pub basis: Quat,
    pub casts_shadows: bool,
}

impl SceneObject {
    pub fn model(&self) -> Mat4 {
        Mat4::from_quat(self.basis) * self.transform.matrix()
    }
}

/// Camera, light and object poses for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub time: f32,
    pub camera: Camera,
    pub light: Light,
    pub objects: Vec<SceneObject>,
}
