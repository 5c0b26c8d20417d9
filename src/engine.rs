//! The render engine: owns the GPU context, the ping-pong accumulation
//! targets, and the pass chain.
//!
//! Frame sequence: pathtrace (into the write accumulation target,
//! sampling the read target as history) → post (exposure + tonemap into
//! the scene color target) → bloom (prefilter, downsample, upsample) →
//! composite (scene + bloom into the swapchain). The ping-pong parity
//! flips after every presented frame.

use glam::Vec3;

use crate::camera::Camera;
use crate::error::GlintError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::Options;
use crate::renderer::accumulation::AccumulationController;
use crate::renderer::passes::bloom::BloomPass;
use crate::renderer::passes::composite::CompositePass;
use crate::renderer::passes::pathtrace::PathtracePass;
use crate::renderer::passes::post::PostPass;
use crate::renderer::target::RenderTarget;
use crate::scene::Scene;
use crate::util::frame_timing::FrameTiming;

/// Orchestrates the full pathtrace → post → bloom → composite chain.
pub struct RenderEngine {
    context: RenderContext,
    accumulation_targets: [RenderTarget; 2],
    write_index: usize,

    pathtrace_pass: PathtracePass,
    post_pass: PostPass,
    bloom_pass: BloomPass,
    composite_pass: CompositePass,

    accumulation: AccumulationController,
    scene: Scene,
    camera: Camera,
    options: Options,

    /// Frame pacing and smoothed FPS statistics.
    pub frame_timing: FrameTiming,
}

impl RenderEngine {
    /// Create an engine presenting to the given window surface.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Gpu`] if context creation fails, or any
    /// construction error from [`Self::with_context`].
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        scene: Scene,
        options: Options,
    ) -> Result<Self, GlintError> {
        let mut context = RenderContext::new(window, initial_size).await?;
        context.set_vsync(options.display.vsync);
        Self::with_context(context, scene, options)
    }

    /// Create an engine over an existing context (texture-only rendering
    /// uses [`RenderContext::from_device`]).
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] for invalid render dimensions,
    /// [`GlintError::ShaderCompile`] if any shader fails to compose, or
    /// [`GlintError::SlotCollision`] for a broken pass binding layout.
    pub fn with_context(
        context: RenderContext,
        scene: Scene,
        options: Options,
    ) -> Result<Self, GlintError> {
        let width = context.render_width();
        let height = context.render_height();

        let accumulation_targets = [
            RenderTarget::new(
                &context,
                "Accumulation A",
                width,
                height,
                wgpu::TextureFormat::Rgba16Float,
                false,
            )?,
            RenderTarget::new(
                &context,
                "Accumulation B",
                width,
                height,
                wgpu::TextureFormat::Rgba16Float,
                false,
            )?,
        ];
        let accumulation_views = [
            accumulation_targets[0].color_view(),
            accumulation_targets[1].color_view(),
        ];

        let mut shader_composer = ShaderComposer::new()?;

        let pathtrace_pass = PathtracePass::new(
            &context,
            &mut shader_composer,
            accumulation_views,
            scene.mesh.vertices(),
        )?;
        let post_pass =
            PostPass::new(&context, &mut shader_composer, accumulation_views)?;
        let bloom_pass = BloomPass::new(
            &context,
            &mut shader_composer,
            post_pass.output_view(),
            options.post_processing.bloom_mip_levels.max(1),
        )?;
        let composite_pass = CompositePass::new(
            &context,
            &mut shader_composer,
            post_pass.output_view(),
            bloom_pass.output_view(),
        )?;

        let accumulation =
            AccumulationController::new(options.accumulation.enabled);
        let camera = Camera::new(Vec3::from(options.camera.position));
        let frame_timing = FrameTiming::new(options.display.target_fps);

        log::info!(
            "engine ready: {width}x{height}, {} objects, {} mesh triangles, \
             {} bloom mips",
            scene.objects.len(),
            scene.mesh.triangle_count(),
            options.post_processing.bloom_mip_levels.max(1),
        );

        Ok(Self {
            context,
            accumulation_targets,
            write_index: 0,
            pathtrace_pass,
            post_pass,
            bloom_pass,
            composite_pass,
            accumulation,
            scene,
            camera,
            options,
            frame_timing,
        })
    }

    /// Render and present one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when swapchain acquisition fails;
    /// the caller decides whether to resize (Lost/Outdated) or abort.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }

        // Accumulation bookkeeping happens before any GPU work so the
        // uniforms below see the post-advance frame index.
        self.accumulation.set_enabled(self.options.accumulation.enabled);
        let camera_moved = self.camera.take_moved();
        if camera_moved && self.options.accumulation.reset_on_camera_move {
            self.accumulation.request_reset();
        }
        self.accumulation.advance();

        let read_index = self.write_index ^ 1;
        self.update_gpu_state();

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        self.pathtrace_pass.render(
            &mut encoder,
            self.accumulation_targets[self.write_index].color_view(),
            read_index,
        );
        // Post samples the target the pathtrace pass just wrote.
        self.post_pass.render(&mut encoder, self.write_index);
        if self.options.post_processing.bloom {
            self.bloom_pass.render(&mut encoder);
        }
        self.composite_pass.render(&mut encoder, &view);

        self.context.submit(encoder);
        frame.present();

        self.write_index ^= 1;
        self.frame_timing.end_frame();

        Ok(())
    }

    /// Flush per-frame uniforms and parameters for every pass.
    fn update_gpu_state(&mut self) {
        let queue = &self.context.queue;

        self.pathtrace_pass.upload_objects(queue, &self.scene.objects);
        let uniforms = &mut self.pathtrace_pass.uniforms;
        uniforms.resolution = [
            self.context.config.width as f32,
            self.context.config.height as f32,
        ];
        uniforms.time = self.frame_timing.elapsed_seconds();
        uniforms.frame_index = self.accumulation.frame_index();
        uniforms.camera_pos = self.camera.position().to_array();
        uniforms.accumulate = u32::from(self.accumulation.enabled());
        uniforms.camera_rot = self.camera.rotation().to_array();
        uniforms.mesh_vertex_count = self.scene.mesh.vertex_count() as u32;
        self.pathtrace_pass.flush_uniforms(queue);

        let pp = &self.options.post_processing;
        self.post_pass.params.exposure = pp.exposure;
        self.post_pass.params.tonemap = u32::from(pp.tonemap);
        self.post_pass.flush_params(queue);

        self.bloom_pass.threshold = pp.bloom_threshold;
        self.bloom_pass.filter_radius = pp.bloom_filter_radius;
        self.bloom_pass.update_params(queue);

        // With bloom off the chain is skipped entirely; a zero mix keeps
        // the stale bloom texture out of the composite.
        self.composite_pass.params.bloom_mix =
            if pp.bloom { pp.bloom_mix } else { 0.0 };
        self.composite_pass.flush_params(queue);
    }

    /// Resize every size-dependent resource. Zero dimensions are ignored.
    /// Accumulated history is discarded since its contents no longer
    /// match the render resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        if let Err(e) = self.resize_targets() {
            log::error!("resize to {width}x{height} failed: {e}");
        }
    }

    fn resize_targets(&mut self) -> Result<(), GlintError> {
        let width = self.context.render_width();
        let height = self.context.render_height();

        self.accumulation_targets[0].resize(&self.context, width, height)?;
        self.accumulation_targets[1].resize(&self.context, width, height)?;
        let accumulation_views = [
            self.accumulation_targets[0].color_view(),
            self.accumulation_targets[1].color_view(),
        ];

        self.pathtrace_pass.rebind(&self.context, accumulation_views);
        self.post_pass.resize(&self.context, accumulation_views)?;
        self.bloom_pass.resize(&self.context, self.post_pass.output_view())?;
        self.composite_pass.rebind(
            &self.context,
            self.post_pass.output_view(),
            self.bloom_pass.output_view(),
        );

        self.accumulation.request_reset();
        Ok(())
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options, applying presentation changes immediately.
    pub fn set_options(&mut self, options: Options) {
        if options.display.vsync != self.options.display.vsync {
            self.context.set_vsync(options.display.vsync);
        }
        if options.display.target_fps != self.options.display.target_fps {
            self.frame_timing.set_target_fps(options.display.target_fps);
        }
        self.options = options;
    }

    /// The camera driving the pathtrace uniforms.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The scene's analytic objects and mesh.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current accumulation frame index (-1 before the first frame).
    #[must_use]
    pub fn frame_index(&self) -> i32 {
        self.accumulation.frame_index()
    }

    /// Toggle temporal accumulation. Enabling restarts accumulation from
    /// scratch on the next frame.
    pub fn set_accumulation(&mut self, enabled: bool) {
        self.options.accumulation.enabled = enabled;
    }

    /// Discard accumulated history; the next frame restarts at index 0.
    pub fn reset_accumulation(&mut self) {
        self.accumulation.request_reset();
    }

    /// Move the camera relative to its yaw, scaled by the configured
    /// move speed and the frame delta.
    pub fn move_camera(&mut self, direction: Vec3, dt: f32) {
        let speed = self.options.camera.move_speed;
        self.camera.move_relative(direction * speed * dt);
    }

    /// Apply a look delta (pitch, yaw) scaled by the configured look
    /// speed and the frame delta.
    pub fn look_camera(&mut self, delta_pitch: f32, delta_yaw: f32, dt: f32) {
        let speed = self.options.camera.look_speed;
        self.camera.rotate(Vec3::new(
            delta_pitch * speed * dt,
            delta_yaw * speed * dt,
            0.0,
        ));
    }
}
