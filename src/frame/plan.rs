use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Shadow,
    Skybox,
    Lighting,
}

impl std::fmt::Display for PassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PassKind::Shadow => "shadow",
            PassKind::Skybox => "skybox",
            PassKind::Lighting => "lighting",
        };
        f.write_str(name)
    }
}

/// Attachment a pass renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTarget {
    /// Off-screen depth-only target, no color.
    ShadowMap,
    /// Swapchain color plus the main depth buffer.
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    pub write: bool,
    pub compare: wgpu::CompareFunction,
}

/// Fixed-function state of one pass. Pipelines are built from these so the
/// plan and the GPU state cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassDescriptor {
    pub kind: PassKind,
    pub label: &'static str,
    pub target: PassTarget,
    pub depth: DepthState,
    pub cull: Option<wgpu::Face>,
    pub clears: bool,
}

impl PassDescriptor {
    /// Front faces culled so casters store their back-face depth.
    pub const SHADOW: Self = Self {
        kind: PassKind::Shadow,
        label: "Shadow Pass",
        target: PassTarget::ShadowMap,
        depth: DepthState {
            write: true,
            compare: wgpu::CompareFunction::LessEqual,
        },
        cull: Some(wgpu::Face::Front),
        clears: true,
    };

    pub const SKYBOX: Self = Self {
        kind: PassKind::Skybox,
        label: "Skybox Pass",
        target: PassTarget::Surface,
        depth: DepthState {
            write: false,
            compare: wgpu::CompareFunction::Always,
        },
        cull: None,
        clears: true,
    };

    pub const LIGHTING: Self = Self {
        kind: PassKind::Lighting,
        label: "Lighting Pass",
        target: PassTarget::Surface,
        depth: DepthState {
            write: true,
            compare: wgpu::CompareFunction::LessEqual,
        },
        cull: Some(wgpu::Face::Back),
        clears: false,
    };
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("frame plan has no {0} pass")]
    MissingPass(PassKind),
    #[error("frame plan lists the {0} pass twice")]
    DuplicatePass(PassKind),
    #[error("{later} pass must run after the {earlier} pass")]
    OutOfOrder { earlier: PassKind, later: PassKind },
    #[error("{0} pass is the first to draw to the surface but does not clear it")]
    SurfaceNotCleared(PassKind),
    #[error("{0} pass would clear the surface after it was drawn to")]
    SurfaceClearedTwice(PassKind),
    #[error("{kind} pass must target the {expected:?}")]
    WrongTarget { kind: PassKind, expected: PassTarget },
}

/// Ordered list of passes recorded for every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    passes: Vec<PassDescriptor>,
}

impl FramePlan {
    /// Shadow, then skybox, then lighting.
    pub fn standard() -> Self {
        Self {
            passes: vec![
                PassDescriptor::SHADOW,
                PassDescriptor::SKYBOX,
                PassDescriptor::LIGHTING,
            ],
        }
    }

    pub fn new(passes: Vec<PassDescriptor>) -> Result<Self, PlanError> {
        let plan = Self { passes };
        plan.validate()?;
        Ok(plan)
    }

    pub fn passes(&self) -> &[PassDescriptor] {
        &self.passes
    }

    pub fn descriptor(&self, kind: PassKind) -> Option<&PassDescriptor> {
        self.passes.iter().find(|pass| pass.kind == kind)
    }

    fn position(&self, kind: PassKind) -> Result<usize, PlanError> {
        let mut found = self.passes.iter().enumerate().filter(|(_, p)| p.kind == kind);
        let (index, _) = found.next().ok_or(PlanError::MissingPass(kind))?;
        if found.next().is_some() {
            return Err(PlanError::DuplicatePass(kind));
        }
        Ok(index)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        let shadow = self.position(PassKind::Shadow)?;
        let skybox = self.position(PassKind::Skybox)?;
        let lighting = self.position(PassKind::Lighting)?;

        if shadow > lighting {
            return Err(PlanError::OutOfOrder {
                earlier: PassKind::Shadow,
                later: PassKind::Lighting,
            });
        }
        if skybox > lighting {
            return Err(PlanError::OutOfOrder {
                earlier: PassKind::Skybox,
                later: PassKind::Lighting,
            });
        }

        for pass in &self.passes {
            let expected = match pass.kind {
                PassKind::Shadow => PassTarget::ShadowMap,
                PassKind::Skybox | PassKind::Lighting => PassTarget::Surface,
            };
            if pass.target != expected {
                return Err(PlanError::WrongTarget {
                    kind: pass.kind,
                    expected,
                });
            }
        }

        let mut surface_passes = self
            .passes
            .iter()
            .filter(|pass| pass.target == PassTarget::Surface);
        if let Some(first) = surface_passes.next() {
            if !first.clears {
                return Err(PlanError::SurfaceNotCleared(first.kind));
            }
        }
        if let Some(late) = surface_passes.find(|pass| pass.clears) {
            return Err(PlanError::SurfaceClearedTwice(late.kind));
        }

        Ok(())
    }
}

impl Default for FramePlan {
    fn default() -> Self {
        Self::standard()
    }
}
