//! Fullscreen path tracing pass with temporal accumulation.
//!
//! Renders into one of two ping-pong accumulation targets while
//! sampling the other as history, so the shader never reads the texture
//! the pass is writing. The engine flips the parity every frame.

use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use crate::error::GlintError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    storage_buffer_read_only, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::slot::{SlotRegistry, TextureSlot};
use crate::scene::{MeshVertex, SceneObject};

/// Maximum number of analytic objects uploaded per frame.
pub const MAX_OBJECTS: usize = 64;

/// Per-frame uniforms — must match the WGSL struct layout.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PathtraceUniforms {
    /// Render resolution in pixels.
    pub resolution: [f32; 2],
    /// Seconds since engine start (monotonic, independent of frame index).
    pub time: f32,
    /// Accumulation frame index; -1 means no history.
    pub frame_index: i32,
    /// Camera position in world space.
    pub camera_pos: [f32; 3],
    /// 1 when accumulation is enabled.
    pub accumulate: u32,
    /// Camera rotation (pitch, yaw, roll) in radians.
    pub camera_rot: [f32; 3],
    /// Number of valid entries in the object buffer.
    pub object_count: u32,
    /// Number of valid mesh vertices (multiple of 3).
    pub mesh_vertex_count: u32,
    /// Struct padding to a 16-byte multiple.
    pub _pad: [u32; 3],
}

/// The path tracing pass.
pub struct PathtracePass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_groups: [wgpu::BindGroup; 2],
    uniforms_buffer: wgpu::Buffer,
    objects_buffer: wgpu::Buffer,
    mesh_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    /// CPU-side uniform values, flushed with [`Self::flush_uniforms`].
    pub uniforms: PathtraceUniforms,
}

impl PathtracePass {
    /// Build the pass: pipeline, uniform/storage buffers, and one bind
    /// group per ping-pong history view.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::ShaderCompile`] on composition failure or
    /// [`GlintError::SlotCollision`] if the binding layout is invalid.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        history_views: [&wgpu::TextureView; 2],
        mesh_vertices: &[MeshVertex],
    ) -> Result<Self, GlintError> {
        let mut slots = SlotRegistry::new();
        slots.claim(TextureSlot::HISTORY)?;

        let sampler = linear_sampler(&context.device, "Pathtrace History Sampler");

        let uniforms = PathtraceUniforms {
            resolution: [
                context.render_width() as f32,
                context.render_height() as f32,
            ],
            ..PathtraceUniforms::zeroed()
        };
        let uniforms_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Pathtrace Uniforms"),
                contents: bytemuck::cast_slice(&[uniforms]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let objects_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pathtrace Objects"),
            size: (MAX_OBJECTS * size_of::<SceneObject>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // An empty storage binding is not allowed; an empty mesh is
        // uploaded as one zeroed vertex with mesh_vertex_count = 0.
        let mesh_contents: Vec<MeshVertex> = if mesh_vertices.is_empty() {
            vec![MeshVertex::zeroed()]
        } else {
            mesh_vertices.to_vec()
        };
        let mesh_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Pathtrace Mesh Vertices"),
                contents: bytemuck::cast_slice(&mesh_contents),
                usage: wgpu::BufferUsages::STORAGE,
            },
        );

        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Pathtrace Bind Group Layout"),
                entries: &[
                    uniform_buffer(0),
                    texture_2d(1),
                    filtering_sampler(2),
                    storage_buffer_read_only(3),
                    storage_buffer_read_only(4),
                ],
            },
        );

        let bind_groups = Self::create_bind_groups(
            context,
            &bind_group_layout,
            history_views,
            &sampler,
            &uniforms_buffer,
            &objects_buffer,
            &mesh_buffer,
        );

        let shader = shader_composer.compose(
            &context.device,
            "Pathtrace Shader",
            include_str!("../../../assets/shaders/pathtrace.wgsl"),
            "pathtrace.wgsl",
        )?;

        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Pathtrace",
            &shader,
            wgpu::TextureFormat::Rgba16Float,
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_groups,
            uniforms_buffer,
            objects_buffer,
            mesh_buffer,
            sampler,
            uniforms,
        })
    }

    fn create_bind_groups(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        history_views: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
        uniforms_buffer: &wgpu::Buffer,
        objects_buffer: &wgpu::Buffer,
        mesh_buffer: &wgpu::Buffer,
    ) -> [wgpu::BindGroup; 2] {
        history_views.map(|view| {
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Pathtrace Bind Group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniforms_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                        wgpu::BindGroupEntry {
                            binding: 3,
                            resource: objects_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 4,
                            resource: mesh_buffer.as_entire_binding(),
                        },
                    ],
                })
        })
    }

    /// Upload the analytic object list. Objects beyond [`MAX_OBJECTS`]
    /// are dropped. Re-sent every frame so live edits take effect.
    pub fn upload_objects(&mut self, queue: &wgpu::Queue, objects: &[SceneObject]) {
        let count = objects.len().min(MAX_OBJECTS);
        if count > 0 {
            queue.write_buffer(
                &self.objects_buffer,
                0,
                bytemuck::cast_slice(&objects[..count]),
            );
        }
        self.uniforms.object_count = count as u32;
    }

    /// Push the CPU-side uniforms to the GPU.
    pub fn flush_uniforms(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.uniforms_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );
    }

    /// Encode the pathtrace pass: write into `write_view` while sampling
    /// the history bind group at `read_index`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        write_view: &wgpu::TextureView,
        read_index: usize,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Pathtrace Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: write_view,
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

    /// Recreate the history bind groups after the accumulation targets
    /// were reallocated (resize).
    pub fn rebind(
        &mut self,
        context: &RenderContext,
        history_views: [&wgpu::TextureView; 2],
    ) {
        self.bind_groups = Self::create_bind_groups(
            context,
            &self.bind_group_layout,
            history_views,
            &self.sampler,
            &self.uniforms_buffer,
            &self.objects_buffer,
            &self.mesh_buffer,
        );
        self.uniforms.resolution = [
            context.render_width() as f32,
            context.render_height() as f32,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_match_wgsl_layout() {
        assert_eq!(size_of::<PathtraceUniforms>(), 64);
        assert_eq!(std::mem::offset_of!(PathtraceUniforms, camera_pos), 16);
        assert_eq!(std::mem::offset_of!(PathtraceUniforms, accumulate), 28);
        assert_eq!(std::mem::offset_of!(PathtraceUniforms, camera_rot), 32);
        assert_eq!(std::mem::offset_of!(PathtraceUniforms, object_count), 44);
        assert_eq!(
            std::mem::offset_of!(PathtraceUniforms, mesh_vertex_count),
            48
        );
    }
}
