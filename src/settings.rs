use std::path::PathBuf;

use glam::{Vec3, Vec4};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::asset::FaceFiles;

const MAX_SHADOW_MAP_SIZE: u32 = 8192;
const ORBIT_SAMPLES: usize = 720;

/// Start-time configuration. Read once before the window opens and never
/// mutated while frames are running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "RenderSettings::default_shadow_map_size")]
    pub shadow_map_size: u32,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub present_mode: PresentModeSetting,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub light: LightSettings,
    #[serde(default)]
    pub lighting: LightingSettings,
    #[serde(default)]
    pub scene: SceneSettings,
    #[serde(default)]
    pub assets: AssetSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            shadow_map_size: Self::default_shadow_map_size(),
            resolution: Resolution::default(),
            present_mode: PresentModeSetting::default(),
            camera: CameraSettings::default(),
            light: LightSettings::default(),
            lighting: LightingSettings::default(),
            scene: SceneSettings::default(),
            assets: AssetSettings::default(),
        }
    }
}

impl RenderSettings {
    pub fn load() -> Self {
        Self::load_from_path("settings.json")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RenderSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded render settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default render settings.",
                        path, err
                    );
                    RenderSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Render settings file {:?} not found. Using default settings.",
                    path
                );
                RenderSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default render settings.",
                    path, err
                );
                RenderSettings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if self.shadow_map_size == 0 {
            warn!("Shadow map size must be greater than zero. Using default value.");
            self.shadow_map_size = Self::default_shadow_map_size();
        } else if self.shadow_map_size > MAX_SHADOW_MAP_SIZE {
            warn!(
                "Shadow map size {} exceeds {}. Clamping.",
                self.shadow_map_size, MAX_SHADOW_MAP_SIZE
            );
            self.shadow_map_size = MAX_SHADOW_MAP_SIZE;
        }

        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        let camera_defaults = CameraSettings::default();
        if !valid_fov(self.camera.fov_degrees) {
            warn!(
                "Camera field of view {} is out of range. Using {}.",
                self.camera.fov_degrees, camera_defaults.fov_degrees
            );
            self.camera.fov_degrees = camera_defaults.fov_degrees;
        }
        if !valid_clip_range(self.camera.near, self.camera.far) {
            warn!(
                "Camera clip range {}..{} is invalid. Using defaults.",
                self.camera.near, self.camera.far
            );
            self.camera.near = camera_defaults.near;
            self.camera.far = camera_defaults.far;
        }
        if !self.camera.up.is_finite() || self.camera.up.length_squared() < 1e-6 {
            warn!(
                "Camera up vector {:?} is degenerate. Using {:?}.",
                self.camera.up, camera_defaults.up
            );
            self.camera.up = camera_defaults.up;
        }
        if self.camera.looks_along_up() {
            warn!("Camera orbit looks straight along its up vector. Using default orbit.");
            self.camera.orbit_radius_x = camera_defaults.orbit_radius_x;
            self.camera.orbit_radius_z = camera_defaults.orbit_radius_z;
            self.camera.height = camera_defaults.height;
            self.camera.target = camera_defaults.target;
            self.camera.up = camera_defaults.up;
        }

        let light_defaults = LightSettings::default();
        if !valid_fov(self.light.fov_degrees) {
            warn!(
                "Light field of view {} is out of range. Using {}.",
                self.light.fov_degrees, light_defaults.fov_degrees
            );
            self.light.fov_degrees = light_defaults.fov_degrees;
        }
        if !valid_clip_range(self.light.near, self.light.far) {
            warn!(
                "Light clip range {}..{} is invalid. Using defaults.",
                self.light.near, self.light.far
            );
            self.light.near = light_defaults.near;
            self.light.far = light_defaults.far;
        }
        if self.light.position.distance_squared(self.light.target) < 1e-6 {
            warn!("Light position equals its target. Using default light placement.");
            self.light.position = light_defaults.position;
            self.light.target = light_defaults.target;
        }

        if !(0.0..=1.0).contains(&self.lighting.shadow_floor) {
            let clamped = self.lighting.shadow_floor.clamp(0.0, 1.0);
            warn!(
                "Shadow floor {} must be within [0, 1]. Clamping to {}.",
                self.lighting.shadow_floor, clamped
            );
            self.lighting.shadow_floor = clamped;
        }
        if self.lighting.shininess <= 0.0 {
            warn!("Shininess must be positive. Using default value.");
            self.lighting.shininess = LightingSettings::default().shininess;
        }

        if self.scene.ground_size <= 0.0 {
            warn!("Ground size must be positive. Using default value.");
            self.scene.ground_size = SceneSettings::default().ground_size;
        }

        self
    }

    pub fn present_mode(&self, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        let desired = self.present_mode.to_wgpu();
        if available.contains(&desired) {
            return desired;
        }

        warn!(
            "Requested present mode {:?} is not supported. Falling back to FIFO.",
            desired
        );

        if available.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            available
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo)
        }
    }

    const fn default_shadow_map_size() -> u32 {
        512
    }
}

fn valid_fov(degrees: f32) -> bool {
    degrees > 1.0 && degrees < 179.0
}

fn valid_clip_range(near: f32, far: f32) -> bool {
    near > 0.0 && far > near
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Orbiting camera: `eye = (sin(t·speed)·radius_x, height, cos(t·speed)·radius_z)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub orbit_radius_x: f32,
    pub orbit_radius_z: f32,
    pub height: f32,
    pub orbit_speed: f32,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraSettings {
    /// Eye position at `angle` radians along the orbit.
    pub fn orbit_eye(&self, angle: f32) -> Vec3 {
        Vec3::new(
            angle.sin() * self.orbit_radius_x,
            self.height,
            angle.cos() * self.orbit_radius_z,
        )
    }

    /// True if any point of the orbit sits on the target or views it along `up`.
    fn looks_along_up(&self) -> bool {
        let up = self.up.normalize_or_zero();
        (0..ORBIT_SAMPLES).any(|i| {
            let angle = i as f32 / ORBIT_SAMPLES as f32 * std::f32::consts::TAU;
            let direction = (self.target - self.orbit_eye(angle)).normalize_or_zero();
            direction == Vec3::ZERO || direction.dot(up).abs() > 0.999
        })
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 72.0,
            near: 0.1,
            far: 100.0,
            orbit_radius_x: 7.0,
            orbit_radius_z: 6.0,
            height: 6.0,
            orbit_speed: 0.05,
            target: Vec3::new(0.0, -1.0, 0.0),
            up: Vec3::Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 3.5),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 18.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    pub base_color: Vec4,
    pub ambient_color: Vec4,
    pub shininess: f32,
    pub specular_scale: f32,
    /// Lower bound applied to shadow visibility in the diffuse term.
    pub shadow_floor: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            base_color: Vec4::new(1.0, 0.9, 0.5, 1.0),
            ambient_color: Vec4::new(1.0, 0.2, 0.3, 1.0) * 0.7,
            shininess: 100.0,
            specular_scale: 0.7,
            shadow_floor: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub orbiter: bool,
    pub ground: bool,
    pub ground_size: f32,
    pub ground_height: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            orbiter: true,
            ground: true,
            ground_size: 12.0,
            ground_height: -1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// JSON mesh for the central object; the built-in cube when unset.
    pub model_path: Option<PathBuf>,
    pub skybox_dir: PathBuf,
    pub skybox_faces: FaceFiles,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            skybox_dir: PathBuf::from("assets/skybox"),
            skybox_faces: FaceFiles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeSetting {
    Fifo,
    FifoRelaxed,
    Immediate,
    Mailbox,
    AutoVsync,
    AutoNoVsync,
}

impl PresentModeSetting {
    fn to_wgpu(&self) -> wgpu::PresentMode {
        match self {
            PresentModeSetting::Fifo => wgpu::PresentMode::Fifo,
            PresentModeSetting::FifoRelaxed => wgpu::PresentMode::FifoRelaxed,
            PresentModeSetting::Immediate => wgpu::PresentMode::Immediate,
            PresentModeSetting::Mailbox => wgpu::PresentMode::Mailbox,
            PresentModeSetting::AutoVsync => wgpu::PresentMode::AutoVsync,
            PresentModeSetting::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
        }
    }
}

impl Default for PresentModeSetting {
    fn default() -> Self {
        PresentModeSetting::Fifo
    }
}
