use std::cell::Cell;
use std::time::Duration;

use glam::{Mat4, Vec2, Vec3};
use wgpu_shadows::error::FrameError;
use wgpu_shadows::frame::shading::skybox_direction;
use wgpu_shadows::frame::{
    skybox_view_proj_inverse, FrameBackend, FrameContext, FrameDriver, FrameOutcome, FramePlan,
    PassDescriptor, PassKind, PassMode,
};
use wgpu_shadows::scene::{Camera, SceneDescription};
use wgpu_shadows::settings::{CameraSettings, RenderSettings};

const EPSILON: f32 = 1e-4;

fn max_abs_diff(a: Mat4, b: Mat4) -> f32 {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

#[test]
fn skybox_center_direction_ignores_camera_translation() {
    let base = Camera::orbiting(&CameraSettings::default(), 3.0);
    let offset = Vec3::new(40.0, -12.0, 7.5);
    let moved = Camera {
        eye: base.eye + offset,
        target: base.target + offset,
        ..base
    };

    let aspect = 16.0 / 9.0;
    let a = skybox_view_proj_inverse(base.proj(aspect), base.rotation_view()).unwrap();
    let b = skybox_view_proj_inverse(moved.proj(aspect), moved.rotation_view()).unwrap();

    let dir_a = skybox_direction(a, Vec2::ZERO);
    let dir_b = skybox_direction(b, Vec2::ZERO);
    assert!(dir_a.abs_diff_eq(dir_b, EPSILON), "{dir_a:?} vs {dir_b:?}");

    let forward = (base.target - base.eye).normalize();
    assert!(dir_a.abs_diff_eq(forward, EPSILON), "{dir_a:?} vs {forward:?}");
}

#[test]
fn skybox_corners_point_away_from_center() {
    let camera = Camera::default();
    let inverse = skybox_view_proj_inverse(camera.proj(1.0), camera.rotation_view()).unwrap();
    let center = skybox_direction(inverse, Vec2::ZERO);
    for corner in [Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0)] {
        let dir = skybox_direction(inverse, corner);
        assert!((dir.length() - 1.0).abs() < EPSILON);
        assert!(dir.dot(center) < 1.0 - EPSILON);
        assert!(dir.dot(center) > 0.0);
    }
}

#[test]
fn view_proj_is_bit_identical_on_recompute() {
    let scene = SceneDescription::from_settings(&RenderSettings::default());
    let a = FrameContext::new(scene.state_at(12.34), 1.6);
    let b = FrameContext::new(scene.state_at(12.34), 1.6);
    assert_eq!(
        a.matrices.view_proj.to_cols_array(),
        b.matrices.view_proj.to_cols_array()
    );
    assert_eq!(a.matrices.view_proj, a.matrices.projection * a.matrices.view);
}

#[test]
fn orbiting_camera_moves_continuously() {
    let scene = SceneDescription::from_settings(&RenderSettings::default());
    let step = 1.0 / 60.0;
    let mut previous = FrameContext::new(scene.state_at(0.0), 1.5).matrices.view_proj;
    for frame in 1..600 {
        let current = FrameContext::new(scene.state_at(frame as f32 * step), 1.5)
            .matrices
            .view_proj;
        assert!(max_abs_diff(previous, current) < 0.05, "jump at frame {frame}");
        previous = current;
    }

    let start = FrameContext::new(scene.state_at(0.0), 1.5).matrices.view_proj;
    let later = FrameContext::new(scene.state_at(10.0), 1.5).matrices.view_proj;
    assert!(max_abs_diff(start, later) > 0.5);
}

#[test]
fn degenerate_camera_settings_still_produce_finite_frames() {
    let dir = tempfile::tempdir().unwrap();
    for (i, camera) in [
        r#"{ "up": [0.0, 0.0, 0.0] }"#,
        r#"{ "orbit_radius_x": 0.0, "orbit_radius_z": 0.0 }"#,
    ]
    .into_iter()
    .enumerate()
    {
        let path = dir.path().join(format!("settings{i}.json"));
        std::fs::write(&path, format!(r#"{{ "camera": {camera} }}"#)).unwrap();

        let settings = RenderSettings::load_from_path(&path);
        assert_eq!(settings.camera.up, Vec3::Y, "{camera}");

        let scene = SceneDescription::from_settings(&settings);
        for time in [0.0, 1.0, 31.4, 250.0] {
            let frame = FrameContext::new(scene.state_at(time), 1.5);
            assert!(frame.matrices.view_proj.is_finite(), "{camera} at t={time}");
            assert!(frame
                .matrices
                .objects
                .iter()
                .all(|object| object.model_view_proj.is_finite()));
            assert!(frame.matrices.skybox_inverse.is_some());
        }
    }
}

#[test]
fn setup_twice_gives_identical_initial_frame() {
    let settings = RenderSettings::default();
    let plan = FramePlan::standard();
    let a = FrameDriver::new(SceneDescription::from_settings(&settings), plan.clone());
    let b = FrameDriver::new(SceneDescription::from_settings(&settings), plan);
    assert_eq!(a.prepare(0.0, 1.5), b.prepare(0.0, 1.5));
}

#[derive(Default)]
struct CapturingBackend {
    frames: Vec<FrameContext>,
    passes: Vec<PassKind>,
    fail_begin: bool,
}

impl FrameBackend for CapturingBackend {
    fn aspect_ratio(&self) -> f32 {
        4.0 / 3.0
    }

    fn begin_frame(&mut self, frame: &FrameContext) -> Result<(), FrameError> {
        if self.fail_begin {
            return Err(FrameError::Surface(wgpu::SurfaceError::Outdated));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn execute_pass(
        &mut self,
        pass: &PassDescriptor,
        _mode: PassMode,
        _frame: &FrameContext,
    ) -> Result<(), FrameError> {
        self.passes.push(pass.kind);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), FrameError> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingScheduler(Cell<u32>);

impl wgpu_shadows::frame::FrameScheduler for CountingScheduler {
    fn request_next_frame(&self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn driver_feeds_backend_frames_at_host_time() {
    let settings = RenderSettings::default();
    let scene = SceneDescription::from_settings(&settings);
    let mut driver = FrameDriver::new(scene.clone(), FramePlan::standard());
    let mut backend = CapturingBackend::default();
    let scheduler = CountingScheduler::default();

    for ms in [0u64, 16, 33, 50] {
        driver.tick(Duration::from_millis(ms), &mut backend, &scheduler);
    }

    assert_eq!(backend.frames.len(), 4);
    let last = backend.frames.last().unwrap();
    assert!((last.time - 0.05).abs() < 1e-6);
    assert_eq!(*last, FrameContext::new(scene.state_at(last.time), 4.0 / 3.0));
    assert_eq!(
        &backend.passes[..3],
        [PassKind::Shadow, PassKind::Skybox, PassKind::Lighting]
    );
    assert_eq!(scheduler.0.get(), 4);
}

#[test]
fn surface_errors_drop_frames_without_stopping_the_loop() {
    let mut driver = FrameDriver::new(
        SceneDescription::from_settings(&RenderSettings::default()),
        FramePlan::standard(),
    );
    let mut backend = CapturingBackend {
        fail_begin: true,
        ..Default::default()
    };
    let scheduler = CountingScheduler::default();

    for ms in 0..5u64 {
        let outcome = driver.tick(Duration::from_millis(ms * 16), &mut backend, &scheduler);
        assert_eq!(outcome, FrameOutcome::Dropped);
    }
    assert!(backend.passes.is_empty());
    assert_eq!(scheduler.0.get(), 5);
    assert_eq!(driver.dropped_count(), 5);
}
