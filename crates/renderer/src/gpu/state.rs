use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::trace;
use winit::dpi::PhysicalSize;

use crate::compile::EffectKind;
use crate::types::{AdapterProfile, GpuPowerPreference, RenderError};

use super::context::GpuContext;
use super::pipeline::{EffectPipeline, PipelineLayouts};
use super::uniforms::{CurtainsUniforms, FrameUniforms, HaloUniforms};

/// Everything needed to put one curtains frame (plus optional halo) on screen.
pub(crate) struct GpuState {
    context: GpuContext,
    curtains: EffectPipeline,
    halo: EffectPipeline,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        gpu_power: GpuPowerPreference,
    ) -> Result<Self, RenderError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context =
            GpuContext::new(target, initial_size, gpu_power).map_err(RenderError::unavailable)?;
        let layouts = PipelineLayouts::new(&context.device);

        let curtains = EffectPipeline::new::<CurtainsUniforms>(
            &context.device,
            &layouts,
            context.surface_format,
            EffectKind::Curtains,
        )
        .map_err(RenderError::unavailable)?;
        let halo = EffectPipeline::new::<HaloUniforms>(
            &context.device,
            &layouts,
            context.surface_format,
            EffectKind::Halo,
        )
        .map_err(RenderError::unavailable)?;

        Ok(Self {
            context,
            curtains,
            halo,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Recreates the swapchain at the current size after `Lost`/`Outdated`.
    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Hands out the next swapchain texture to draw into.
    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.context.surface.get_current_texture()
    }

    /// Clears `output` to the sampled palette's clear colour, draws the
    /// curtains and, when present, composites the halo on top. Then presents.
    pub(crate) fn present(&self, output: wgpu::SurfaceTexture, frame: &FrameUniforms) {
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.curtains
            .write_uniforms(&self.context.queue, &frame.curtains);
        if let Some(halo) = frame.halo.as_ref() {
            self.halo.write_uniforms(&self.context.queue, halo);
        }

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });

        let [r, g, b, a] = frame.clear_color;
        let clear = wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        };
        encode_pass(&mut encoder, &view, &self.curtains, wgpu::LoadOp::Clear(clear));
        if frame.halo.is_some() {
            encode_pass(&mut encoder, &view, &self.halo, wgpu::LoadOp::Load);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        trace!(halo = frame.halo.is_some(), "presented frame");
    }
}

fn encode_pass(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    effect: &EffectPipeline,
    load: wgpu::LoadOp<wgpu::Color>,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(effect.kind.label()),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    });
    effect.draw(&mut render_pass);
}
