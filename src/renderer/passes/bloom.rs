//! Bloom pass — prefilter, downsample chain, upsample chain.
//!
//! Pipeline: brightness prefilter into a full-resolution target, then a
//! downsample traversal over every mip level (13-tap filter), then an
//! upsample traversal back up the chain (9-tap tent) with additive
//! blending baked into the upsample pipeline. The composed bloom
//! texture ends up at mip level 0.
//!
//! The pass is deterministic: its only inputs are the scene texture,
//! the per-level source resolutions, the threshold, and the filter
//! radius. No time-dependent state anywhere.

use wgpu::util::DeviceExt;

use crate::error::GlintError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::renderer::mip_chain::MipChain;
use crate::renderer::target::RenderTarget;

/// Prefilter threshold params — must match the WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct PrefilterParams {
    threshold: f32,
    knee: f32,
    _pad: [f32; 2],
}

/// Downsample params — resolution of the texture being sampled.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct DownsampleParams {
    src_resolution: [f32; 2],
    _pad: [f32; 2],
}

/// Upsample params — tent filter radius in uv space.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct UpsampleParams {
    filter_radius: f32,
    _pad: [f32; 3],
}

/// Multi-pass bloom over a halved-resolution mip chain.
pub struct BloomPass {
    prefilter_pipeline: wgpu::RenderPipeline,
    downsample_pipeline: wgpu::RenderPipeline,
    upsample_pipeline: wgpu::RenderPipeline,

    // Prefilter, downsample, and upsample all bind (texture, sampler,
    // uniform) so one layout serves the three pipelines.
    bind_group_layout: wgpu::BindGroupLayout,

    prefilter_bind_group: wgpu::BindGroup,
    prefilter_buffer: wgpu::Buffer,
    prefilter_target: RenderTarget,

    // Downsample bind group i renders level i, sampling the previous
    // stage (prefilter output for i = 0).
    downsample_bind_groups: Vec<wgpu::BindGroup>,
    downsample_buffers: Vec<wgpu::Buffer>,

    // Upsample bind group i-1 samples level i while rendering level i-1.
    upsample_bind_groups: Vec<wgpu::BindGroup>,
    filter_radius_buffer: wgpu::Buffer,

    chain: MipChain,
    sampler: wgpu::Sampler,

    /// Brightness threshold for the prefilter.
    pub threshold: f32,
    /// Soft-knee width below the threshold.
    pub knee: f32,
    /// Tent filter radius for the upsample traversal.
    pub filter_radius: f32,
}

impl BloomPass {
    /// Build the full bloom chain over `level_count` mips, sampling
    /// `scene_view` as input.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] or [`GlintError::ShaderCompile`];
    /// a broken bloom chain is a startup failure, not a logged warning.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        scene_view: &wgpu::TextureView,
        level_count: usize,
    ) -> Result<Self, GlintError> {
        let width = context.render_width();
        let height = context.render_height();

        let prefilter_target = RenderTarget::new(
            context,
            "Bloom Prefilter",
            width,
            height,
            wgpu::TextureFormat::Rgba16Float,
            false,
        )?;
        let chain = MipChain::new(
            context,
            width,
            height,
            level_count,
            wgpu::TextureFormat::Rgba16Float,
        )?;

        let sampler = linear_sampler(&context.device, "Bloom Sampler");

        let threshold = 1.0;
        let knee = 0.5;
        let filter_radius = 0.01;

        let prefilter_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Bloom Prefilter Params"),
                contents: bytemuck::cast_slice(&[PrefilterParams {
                    threshold,
                    knee,
                    _pad: [0.0; 2],
                }]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );
        let filter_radius_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Bloom Upsample Params"),
                contents: bytemuck::cast_slice(&[UpsampleParams {
                    filter_radius,
                    _pad: [0.0; 3],
                }]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Bloom Bind Group Layout"),
                entries: &[texture_2d(0), filtering_sampler(1), uniform_buffer(2)],
            },
        );

        let prefilter_bind_group = Self::create_sample_bind_group(
            context,
            &bind_group_layout,
            "Bloom Prefilter Bind Group",
            scene_view,
            &sampler,
            &prefilter_buffer,
        );

        let (downsample_bind_groups, downsample_buffers) =
            Self::create_downsample_resources(
                context,
                &bind_group_layout,
                &prefilter_target,
                &chain,
                &sampler,
            );

        let upsample_bind_groups = Self::create_upsample_bind_groups(
            context,
            &bind_group_layout,
            &chain,
            &sampler,
            &filter_radius_buffer,
        );

        let prefilter_shader = shader_composer.compose(
            &context.device,
            "Bloom Prefilter Shader",
            include_str!("../../../assets/shaders/screen/bloom_prefilter.wgsl"),
            "bloom_prefilter.wgsl",
        )?;
        let downsample_shader = shader_composer.compose(
            &context.device,
            "Bloom Downsample Shader",
            include_str!("../../../assets/shaders/screen/bloom_downsample.wgsl"),
            "bloom_downsample.wgsl",
        )?;
        let upsample_shader = shader_composer.compose(
            &context.device,
            "Bloom Upsample Shader",
            include_str!("../../../assets/shaders/screen/bloom_upsample.wgsl"),
            "bloom_upsample.wgsl",
        )?;

        let prefilter_pipeline = create_screen_space_pipeline(
            &context.device,
            "Bloom Prefilter",
            &prefilter_shader,
            wgpu::TextureFormat::Rgba16Float,
            None,
            &[&bind_group_layout],
        );
        let downsample_pipeline = create_screen_space_pipeline(
            &context.device,
            "Bloom Downsample",
            &downsample_shader,
            wgpu::TextureFormat::Rgba16Float,
            None,
            &[&bind_group_layout],
        );
        // Additive blend is baked into this pipeline only; every other
        // pipeline carries its own blend state, so nothing to restore.
        let upsample_pipeline = create_screen_space_pipeline(
            &context.device,
            "Bloom Upsample",
            &upsample_shader,
            wgpu::TextureFormat::Rgba16Float,
            Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::OVER,
            }),
            &[&bind_group_layout],
        );

        Ok(Self {
            prefilter_pipeline,
            downsample_pipeline,
            upsample_pipeline,
            bind_group_layout,
            prefilter_bind_group,
            prefilter_buffer,
            prefilter_target,
            downsample_bind_groups,
            downsample_buffers,
            upsample_bind_groups,
            filter_radius_buffer,
            chain,
            sampler,
            threshold,
            knee,
            filter_radius,
        })
    }

    fn create_sample_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
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
                        resource: params.as_entire_binding(),
                    },
                ],
            })
    }

    fn create_downsample_resources(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        prefilter_target: &RenderTarget,
        chain: &MipChain,
        sampler: &wgpu::Sampler,
    ) -> (Vec<wgpu::BindGroup>, Vec<wgpu::Buffer>) {
        let mut bind_groups = Vec::with_capacity(chain.len());
        let mut buffers = Vec::with_capacity(chain.len());

        for i in 0..chain.len() {
            let (src_view, src_width, src_height) = if i == 0 {
                (
                    prefilter_target.color_view(),
                    prefilter_target.width(),
                    prefilter_target.height(),
                )
            } else {
                let prev = chain.level(i - 1);
                (&prev.view, prev.width, prev.height)
            };

            let buffer = context.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Bloom Downsample Params {i}")),
                    contents: bytemuck::cast_slice(&[DownsampleParams {
                        src_resolution: [src_width as f32, src_height as f32],
                        _pad: [0.0; 2],
                    }]),
                    usage: wgpu::BufferUsages::UNIFORM,
                },
            );
            bind_groups.push(Self::create_sample_bind_group(
                context,
                layout,
                &format!("Bloom Downsample Bind Group {i}"),
                src_view,
                sampler,
                &buffer,
            ));
            buffers.push(buffer);
        }

        (bind_groups, buffers)
    }

    fn create_upsample_bind_groups(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        chain: &MipChain,
        sampler: &wgpu::Sampler,
        filter_radius_buffer: &wgpu::Buffer,
    ) -> Vec<wgpu::BindGroup> {
        // Bind group i-1 samples level i while level i-1 is the target.
        (1..chain.len())
            .map(|i| {
                Self::create_sample_bind_group(
                    context,
                    layout,
                    &format!("Bloom Upsample Bind Group {i}"),
                    &chain.level(i).view,
                    sampler,
                    filter_radius_buffer,
                )
            })
            .collect()
    }

    /// Push threshold, knee, and filter radius to the GPU.
    pub fn update_params(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.prefilter_buffer,
            0,
            bytemuck::cast_slice(&[PrefilterParams {
                threshold: self.threshold,
                knee: self.knee,
                _pad: [0.0; 2],
            }]),
        );
        queue.write_buffer(
            &self.filter_radius_buffer,
            0,
            bytemuck::cast_slice(&[UpsampleParams {
                filter_radius: self.filter_radius,
                _pad: [0.0; 3],
            }]),
        );
    }

    /// Encode the full bloom traversal:
    /// prefilter, downsample 0..N, upsample N-1..1.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        self.screen_draw(
            encoder,
            "Bloom Prefilter",
            self.prefilter_target.color_view(),
            &self.prefilter_pipeline,
            &self.prefilter_bind_group,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );

        for i in 0..self.chain.len() {
            self.screen_draw(
                encoder,
                "Bloom Downsample",
                &self.chain.level(i).view,
                &self.downsample_pipeline,
                &self.downsample_bind_groups[i],
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            );
        }

        // Load (not clear) so the additive blend accumulates into the
        // downsampled contents of each larger level.
        for i in (1..self.chain.len()).rev() {
            self.screen_draw(
                encoder,
                "Bloom Upsample",
                &self.chain.level(i - 1).view,
                &self.upsample_pipeline,
                &self.upsample_bind_groups[i - 1],
                wgpu::LoadOp::Load,
            );
        }
    }

    fn screen_draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        view: &wgpu::TextureView,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
        load: wgpu::LoadOp<wgpu::Color>,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    /// The composed bloom texture (mip level 0).
    #[must_use]
    pub fn output_view(&self) -> &wgpu::TextureView {
        &self.chain.level(0).view
    }

    /// Rebind the scene input texture (after the post pass target was
    /// recreated).
    pub fn rebind_input(
        &mut self,
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
    ) {
        self.prefilter_bind_group = Self::create_sample_bind_group(
            context,
            &self.bind_group_layout,
            "Bloom Prefilter Bind Group",
            scene_view,
            &self.sampler,
            &self.prefilter_buffer,
        );
    }

    /// Reallocate every level for the new render size and rebuild all
    /// bind groups.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] for invalid dimensions.
    pub fn resize(
        &mut self,
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
    ) -> Result<(), GlintError> {
        let width = context.render_width();
        let height = context.render_height();

        self.prefilter_target.resize(context, width, height)?;
        self.chain.resize(context, width, height)?;

        self.rebind_input(context, scene_view);
        let (downsample_bind_groups, downsample_buffers) =
            Self::create_downsample_resources(
                context,
                &self.bind_group_layout,
                &self.prefilter_target,
                &self.chain,
                &self.sampler,
            );
        self.downsample_bind_groups = downsample_bind_groups;
        self.downsample_buffers = downsample_buffers;
        self.upsample_bind_groups = Self::create_upsample_bind_groups(
            context,
            &self.bind_group_layout,
            &self.chain,
            &self.sampler,
            &self.filter_radius_buffer,
        );
        Ok(())
    }
}
