//! Post pass — exposure and tone mapping of the accumulated radiance.
//!
//! Owns the scene color target the bloom and composite passes sample.

use wgpu::util::DeviceExt;

use crate::error::GlintError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::renderer::target::RenderTarget;

/// Tone mapping parameters — must match the WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostParams {
    /// Linear exposure multiplier applied before tone mapping.
    pub exposure: f32,
    /// 1 to apply the ACES curve, 0 to pass radiance through.
    pub tonemap: u32,
    /// Struct padding.
    pub _pad: [f32; 2],
}

impl Default for PostParams {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            tonemap: 1,
            _pad: [0.0; 2],
        }
    }
}

/// Exposure + tone mapping pass.
pub struct PostPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_groups: [wgpu::BindGroup; 2],
    sampler: wgpu::Sampler,
    target: RenderTarget,
    /// Tone mapping parameters, flushed with [`Self::flush_params`].
    pub params: PostParams,
    params_buffer: wgpu::Buffer,
}

impl PostPass {
    /// Build the pass and its scene color target. One bind group per
    /// ping-pong accumulation view.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::ShaderCompile`] or [`GlintError::Allocation`].
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        accumulation_views: [&wgpu::TextureView; 2],
    ) -> Result<Self, GlintError> {
        let target = RenderTarget::new(
            context,
            "Scene Color",
            context.render_width(),
            context.render_height(),
            wgpu::TextureFormat::Rgba16Float,
            false,
        )?;

        let sampler = linear_sampler(&context.device, "Post Sampler");

        let params = PostParams::default();
        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Post Params"),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Post Bind Group Layout"),
                entries: &[texture_2d(0), filtering_sampler(1), uniform_buffer(2)],
            },
        );

        let bind_groups = Self::create_bind_groups(
            context,
            &bind_group_layout,
            accumulation_views,
            &sampler,
            &params_buffer,
        );

        let shader = shader_composer.compose(
            &context.device,
            "Post Shader",
            include_str!("../../../assets/shaders/screen/post.wgsl"),
            "post.wgsl",
        )?;

        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Post",
            &shader,
            wgpu::TextureFormat::Rgba16Float,
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_groups,
            sampler,
            target,
            params,
            params_buffer,
        })
    }

    fn create_bind_groups(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        accumulation_views: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> [wgpu::BindGroup; 2] {
        accumulation_views.map(|view| {
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Post Bind Group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: params_buffer.as_entire_binding(),
                        },
                    ],
                })
        })
    }

    /// Push the CPU-side params to the GPU.
    pub fn flush_params(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::cast_slice(&[self.params]),
        );
    }

    /// Encode the pass, sampling the accumulation target at
    /// `read_index` (the one the pathtrace pass just wrote).
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, read_index: usize) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Post Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.color_view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[read_index & 1], &[]);
        pass.draw(0..3, 0..1);
    }

    /// The tonemapped scene texture view.
    #[must_use]
    pub fn output_view(&self) -> &wgpu::TextureView {
        self.target.color_view()
    }

    /// Reallocate the scene target and rebind the accumulation views.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] for invalid dimensions.
    pub fn resize(
        &mut self,
        context: &RenderContext,
        accumulation_views: [&wgpu::TextureView; 2],
    ) -> Result<(), GlintError> {
        self.target.resize(
            context,
            context.render_width(),
            context.render_height(),
        )?;
        self.bind_groups = Self::create_bind_groups(
            context,
            &self.bind_group_layout,
            accumulation_views,
            &self.sampler,
            &self.params_buffer,
        );
        Ok(())
    }
}
