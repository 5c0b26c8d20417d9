//! GPU plumbing: device/surface ownership, shader composition, and
//! texture-slot bookkeeping.

pub mod pipeline_helpers;
pub mod render_context;
pub mod shader_composer;
pub mod slot;
