//! Composite pass — blends the bloom texture into the tonemapped scene
//! and writes the swapchain image.

use wgpu::util::DeviceExt;

use crate::error::GlintError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::slot::{SlotRegistry, TextureSlot};

/// Composite parameters — must match the WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeParams {
    /// Scene-to-bloom lerp factor; 0 disables the bloom contribution.
    pub bloom_mix: f32,
    /// Gamma exponent (1.0 when the surface is sRGB).
    pub gamma: f32,
    /// Struct padding.
    pub _pad: [f32; 2],
}

/// Final blend-to-swapchain pass.
pub struct CompositePass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    /// Blend parameters, flushed with [`Self::flush_params`].
    pub params: CompositeParams,
    params_buffer: wgpu::Buffer,
}

impl CompositePass {
    /// Build the pass against the scene and bloom texture views.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::ShaderCompile`] on composition failure or
    /// [`GlintError::SlotCollision`] if the two inputs alias a slot.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        scene_view: &wgpu::TextureView,
        bloom_view: &wgpu::TextureView,
    ) -> Result<Self, GlintError> {
        let mut slots = SlotRegistry::new();
        slots.claim_all(&[TextureSlot::SCENE, TextureSlot::BLOOM])?;

        let sampler = linear_sampler(&context.device, "Composite Sampler");

        // Hardware handles gamma on sRGB surfaces.
        let gamma = if context.format().is_srgb() { 1.0 } else { 2.2 };
        let params = CompositeParams {
            bloom_mix: 0.0,
            gamma,
            _pad: [0.0; 2],
        };
        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Composite Params"),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Composite Bind Group Layout"),
                entries: &[
                    texture_2d(TextureSlot::SCENE.index()),
                    texture_2d(TextureSlot::BLOOM.index()),
                    filtering_sampler(2),
                    uniform_buffer(3),
                ],
            },
        );

        let bind_group = Self::create_bind_group(
            context,
            &bind_group_layout,
            scene_view,
            bloom_view,
            &sampler,
            &params_buffer,
        );

        let shader = shader_composer.compose(
            &context.device,
            "Composite Shader",
            include_str!("../../../assets/shaders/screen/composite.wgsl"),
            "composite.wgsl",
        )?;

        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Composite",
            &shader,
            context.format(),
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            params,
            params_buffer,
        })
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        scene_view: &wgpu::TextureView,
        bloom_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Composite Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: TextureSlot::SCENE.index(),
                        resource: wgpu::BindingResource::TextureView(scene_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: TextureSlot::BLOOM.index(),
                        resource: wgpu::BindingResource::TextureView(bloom_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
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

    /// Encode the pass into the swapchain view.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        final_view: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Composite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: final_view,
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
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    /// Rebind the scene and bloom inputs after a resize recreated them.
    pub fn rebind(
        &mut self,
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
        bloom_view: &wgpu::TextureView,
    ) {
        self.bind_group = Self::create_bind_group(
            context,
            &self.bind_group_layout,
            scene_view,
            bloom_view,
            &self.sampler,
            &self.params_buffer,
        );
    }
}
