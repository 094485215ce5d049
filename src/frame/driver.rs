use std::time::Duration;

use crate::error::FrameError;
use crate::frame::{FrameContext, FramePlan, PassDescriptor, PassKind};
use crate::scene::SceneDescription;
use crate::time::FrameClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// How a pass should be recorded this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    Draw,
    /// Perform the pass's clears but issue no draws.
    ClearOnly,
}

/// Something that can record the passes of a frame, normally the GPU renderer.
pub trait FrameBackend {
    /// Width over height of the surface being drawn to.
    fn aspect_ratio(&self) -> f32;

    /// Acquire the frame's target and upload per-frame data.
    fn begin_frame(&mut self, frame: &FrameContext) -> Result<(), FrameError>;

    fn execute_pass(
        &mut self,
        pass: &PassDescriptor,
        mode: PassMode,
        frame: &FrameContext,
    ) -> Result<(), FrameError>;

    /// Submit and present.
    fn end_frame(&mut self) -> Result<(), FrameError>;

    /// Throw away whatever was recorded since `begin_frame`.
    fn discard_frame(&mut self) {}
}

/// Host hook asking for another tick.
pub trait FrameScheduler {
    fn request_next_frame(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented { cleared_only: Vec<PassKind> },
    Dropped,
}

/// Advances time, rebuilds the frame's matrices and walks the plan.
pub struct FrameDriver {
    state: DriverState,
    clock: FrameClock,
    scene: SceneDescription,
    plan: FramePlan,
    frames: u64,
    dropped: u64,
}

impl FrameDriver {
    pub fn new(scene: SceneDescription, plan: FramePlan) -> Self {
        Self {
            state: DriverState::Idle,
            clock: FrameClock::new(),
            scene,
            plan,
            frames: 0,
            dropped: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Scene state and matrices at `time`; touches no driver state.
    pub fn prepare(&self, time: f32, aspect: f32) -> FrameContext {
        FrameContext::new(self.scene.state_at(time), aspect)
    }

    /// One host callback. Always asks the scheduler for the next one, even
    /// when this frame is dropped.
    pub fn tick<B, S>(&mut self, timestamp: Duration, backend: &mut B, scheduler: &S) -> FrameOutcome
    where
        B: FrameBackend + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.state == DriverState::Idle {
            log::info!("Frame loop running");
            self.state = DriverState::Running;
        }

        let time = self.clock.advance(timestamp);
        let frame = self.prepare(time, backend.aspect_ratio());

        let outcome = match self.render(&frame, backend) {
            Ok(cleared_only) => {
                self.frames += 1;
                FrameOutcome::Presented { cleared_only }
            }
            Err(err) => {
                self.dropped += 1;
                log::warn!("Dropped frame at t={:.3}s: {}", time, err);
                FrameOutcome::Dropped
            }
        };

        scheduler.request_next_frame();
        outcome
    }

    fn render<B>(&self, frame: &FrameContext, backend: &mut B) -> Result<Vec<PassKind>, FrameError>
    where
        B: FrameBackend + ?Sized,
    {
        backend.begin_frame(frame)?;

        let mut cleared_only = Vec::new();
        for pass in self.plan.passes() {
            let mode = if pass.kind == PassKind::Skybox && frame.matrices.skybox_inverse.is_none() {
                log::debug!("Skybox matrix not invertible, clearing only");
                cleared_only.push(pass.kind);
                PassMode::ClearOnly
            } else {
                PassMode::Draw
            };

            if let Err(err) = backend.execute_pass(pass, mode, frame) {
                backend.discard_frame();
                return Err(err);
            }
        }

        backend.end_frame()?;
        Ok(cleared_only)
    }
}
