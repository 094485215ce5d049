use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::asset::{MeshId, SceneAssets};
use crate::error::{FrameError, SetupError};
use crate::frame::{
    FrameBackend, FrameContext, FramePlan, LightingModel, PassDescriptor, PassKind, PassMode,
};
use crate::renderer::cubemap::GpuCubemap;
use crate::renderer::lighting::LightingPass;
use crate::renderer::mesh::GpuMesh;
use crate::renderer::objects::ObjectBindings;
use crate::renderer::pipeline_builder::{check_buffer_size, check_texture_size, validated};
use crate::renderer::shadow::{ShadowMap, ShadowPass};
use crate::renderer::skybox::SkyboxPass;
use crate::renderer::{Draw, RenderContext, SurfaceTarget};
use crate::scene::SceneState;
use crate::settings::RenderSettings;

struct FrameInFlight {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

/// Owns every GPU resource and records the passes of the frame plan.
pub struct Renderer {
    context: RenderContext,
    meshes: Vec<GpuMesh>,
    objects: ObjectBindings,
    shadow_map: ShadowMap,
    shadow_pass: ShadowPass,
    skybox_pass: SkyboxPass,
    lighting_pass: LightingPass,
    frame: Option<FrameInFlight>,
}

impl Renderer {
    /// Uploads the assets and builds the pipelines. Any failure here is fatal.
    pub async fn new(
        window: Arc<Window>,
        settings: &RenderSettings,
        assets: &SceneAssets,
        plan: &FramePlan,
        object_count: usize,
    ) -> Result<Self, SetupError> {
        let context = RenderContext::new(window, settings).await?;
        let device = &context.device;
        let color_format = context.config.format;
        let depth_format = context.depth.format;

        let limits = device.limits();

        let mut meshes = Vec::with_capacity(MeshId::ALL.len());
        for (id, mesh) in assets.meshes() {
            for bytes in GpuMesh::buffer_sizes(mesh) {
                check_buffer_size(id.resource(), bytes, &limits)?;
            }
            let name = format!("{id:?}");
            let uploaded = validated(device, id.resource(), || {
                GpuMesh::upload(device, &name, mesh)
            })
            .await?;
            meshes.push(uploaded);
        }

        let skybox_size = assets.skybox().size();
        check_texture_size("skybox cubemap", skybox_size, &limits)?;
        let cubemap = validated(device, "skybox cubemap", || {
            GpuCubemap::upload(device, &context.queue, assets.skybox())
        })
        .await?;

        let objects = validated(device, "object uniforms", || {
            ObjectBindings::new(device, object_count)
        })
        .await?;

        check_texture_size("shadow map", settings.shadow_map_size, &limits)?;
        let shadow_map = validated(device, "shadow map", || {
            ShadowMap::new(device, settings.shadow_map_size)
        })
        .await?;

        let shadow = descriptor(plan, PassKind::Shadow, PassDescriptor::SHADOW);
        let skybox = descriptor(plan, PassKind::Skybox, PassDescriptor::SKYBOX);
        let lighting = descriptor(plan, PassKind::Lighting, PassDescriptor::LIGHTING);

        let shadow_pass = validated(device, "shadow pipeline", || {
            ShadowPass::new(device, &objects, &shadow)
        })
        .await?;
        let skybox_pass = validated(device, "skybox pipeline", || {
            SkyboxPass::new(device, color_format, depth_format, cubemap, &skybox)
        })
        .await?;
        let lighting_pass = validated(device, "lighting pipeline", || {
            LightingPass::new(
                device,
                color_format,
                depth_format,
                &objects,
                &shadow_map,
                LightingModel::from_settings(&settings.lighting),
                &lighting,
            )
        })
        .await?;

        log::info!("Renderer ready");

        Ok(Self {
            context,
            meshes,
            objects,
            shadow_map,
            shadow_pass,
            skybox_pass,
            lighting_pass,
            frame: None,
        })
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
    }
}

fn descriptor(plan: &FramePlan, kind: PassKind, fallback: PassDescriptor) -> PassDescriptor {
    plan.descriptor(kind).copied().unwrap_or(fallback)
}

fn collect_draws<'a>(
    meshes: &'a [GpuMesh],
    objects: &'a ObjectBindings,
    scene: &SceneState,
) -> Result<Vec<Draw<'a>>, FrameError> {
    scene
        .objects
        .iter()
        .enumerate()
        .map(|(index, object)| {
            let mesh = meshes
                .get(object.mesh.index())
                .ok_or(FrameError::MissingMesh {
                    name: object.name,
                    mesh: object.mesh.index(),
                })?;
            let bind_group = objects
                .bind_group(index)
                .ok_or(FrameError::MissingBinding(index))?;
            Ok(Draw {
                mesh,
                bind_group,
                casts_shadows: object.casts_shadows,
            })
        })
        .collect()
}

impl FrameBackend for Renderer {
    fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }

    fn begin_frame(&mut self, frame: &FrameContext) -> Result<(), FrameError> {
        if self.frame.take().is_some() {
            log::warn!("Previous frame was never presented; discarding it");
        }

        let surface_texture = match self.context.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.context.reconfigure();
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let context = &self.context;
        self.objects
            .write(&context.device, &context.queue, &frame.matrices.objects);
        self.lighting_pass.update(&context.queue, &frame.scene);
        self.skybox_pass
            .update(&context.queue, frame.matrices.skybox_inverse);

        let encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("FrameEncoder"),
            });

        self.frame = Some(FrameInFlight {
            surface_texture,
            view,
            encoder,
        });
        Ok(())
    }

    fn execute_pass(
        &mut self,
        pass: &PassDescriptor,
        mode: PassMode,
        frame: &FrameContext,
    ) -> Result<(), FrameError> {
        let in_flight = self
            .frame
            .as_mut()
            .ok_or(FrameError::NoFrameInFlight(pass.label))?;

        match pass.kind {
            PassKind::Shadow => {
                let draws = collect_draws(&self.meshes, &self.objects, &frame.scene)?;
                self.shadow_pass.record(
                    &mut in_flight.encoder,
                    pass,
                    mode,
                    &self.shadow_map,
                    &draws,
                );
            }
            PassKind::Skybox => {
                let target = SurfaceTarget {
                    color: &in_flight.view,
                    depth: &self.context.depth.view,
                };
                self.skybox_pass
                    .record(&mut in_flight.encoder, pass, mode, &target);
            }
            PassKind::Lighting => {
                let draws = collect_draws(&self.meshes, &self.objects, &frame.scene)?;
                let target = SurfaceTarget {
                    color: &in_flight.view,
                    depth: &self.context.depth.view,
                };
                self.lighting_pass
                    .record(&mut in_flight.encoder, pass, mode, &target, &draws);
            }
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), FrameError> {
        let in_flight = self
            .frame
            .take()
            .ok_or(FrameError::NoFrameInFlight("present"))?;
        self.context
            .queue
            .submit(std::iter::once(in_flight.encoder.finish()));
        in_flight.surface_texture.present();
        Ok(())
    }

    fn discard_frame(&mut self) {
        if self.frame.take().is_some() {
            log::debug!("Discarded partially recorded frame");
        }
    }
}
