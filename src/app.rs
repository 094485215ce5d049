// app.rs
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::asset::SceneAssets;
use crate::error::SetupError;
use crate::frame::{FrameDriver, FramePlan, FrameScheduler};
use crate::renderer::Renderer;
use crate::scene::SceneDescription;
use crate::settings::RenderSettings;
use crate::time::Instant;

impl FrameScheduler for Window {
    fn request_next_frame(&self) {
        self.request_redraw();
    }
}

enum AppState {
    /// Waiting for the event loop to resume.
    Pending,
    Ready {
        window: Arc<Window>,
        renderer: Renderer,
        driver: FrameDriver,
    },
    /// Setup failed; the error is kept for `run` to return.
    Failed,
}

pub struct App {
    settings: RenderSettings,
    state: AppState,
    started: Instant,
    error: Option<SetupError>,
}

impl App {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            state: AppState::Pending,
            started: Instant::now(),
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<SetupError> {
        self.error.take()
    }

    /// Assets load before the window opens; nothing renders until every
    /// asset and GPU resource exists.
    fn setup(&self, event_loop: &ActiveEventLoop) -> Result<AppState, SetupError> {
        let assets = SceneAssets::load(&self.settings)?;

        let resolution = &self.settings.resolution;
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title("wgpu shadows")
                    .with_inner_size(PhysicalSize::new(resolution.width, resolution.height)),
            )?,
        );

        let scene = SceneDescription::from_settings(&self.settings);
        let plan = FramePlan::standard();
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &self.settings,
            &assets,
            &plan,
            scene.objects.len(),
        ))?;

        Ok(AppState::Ready {
            window,
            renderer,
            driver: FrameDriver::new(scene, plan),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Pending) {
            return;
        }

        match self.setup(event_loop) {
            Ok(state) => {
                if let AppState::Ready { window, .. } = &state {
                    window.request_redraw();
                }
                self.state = state;
            }
            Err(err) => {
                log::error!("Setup failed: {}", err);
                self.error = Some(err);
                self.state = AppState::Failed;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let AppState::Ready {
            window,
            renderer,
            driver,
        } = &mut self.state
        else {
            return;
        };
        if id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!(
                    "Closing after {} frames ({} dropped)",
                    driver.frame_count(),
                    driver.dropped_count()
                );
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                renderer.resize(size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                renderer.resize(window.inner_size());
            }
            WindowEvent::RedrawRequested => {
                driver.tick(self.started.elapsed(), renderer, &**window);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            _ => {}
        }
    }
}
