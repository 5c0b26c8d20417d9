//! Real-time GPU path tracer built on wgpu.
//!
//! glint renders an analytic object scene (plus an optional OBJ triangle
//! mesh) with a fullscreen path tracing pass, temporal accumulation over
//! ping-pong history targets, and a post chain of exposure/tone mapping,
//! multi-pass bloom, and final composite.
//!
//! # Key entry points
//!
//! - [`engine::RenderEngine`] - the rendering engine and pass orchestrator
//! - [`scene::Scene`] - analytic objects and the triangle mesh
//! - [`options::Options`] - runtime configuration (accumulation,
//!   post-processing, camera, display)
//! - [`viewer::Viewer`] - standalone winit window (feature `viewer`)
//!
//! # Architecture
//!
//! Every pass draws a single fullscreen triangle; there are no vertex
//! buffers anywhere. The frame sequence is pathtrace → post → bloom →
//! composite, with the pathtrace pass writing one accumulation target
//! while sampling the other as history. Bloom runs a 13-tap downsample
//! traversal over a halved-resolution mip chain and a 9-tap tent
//! upsample traversal with additive blending.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use camera::Camera;
pub use engine::RenderEngine;
pub use error::GlintError;
pub use options::Options;
pub use scene::Scene;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
