//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::gpu::slot::TextureSlot;

/// Errors produced by the glint crate.
///
/// Construction-time GPU failures (incomplete render targets, shader
/// compile errors) are hard errors: continuing with a broken target
/// produces undefined visual output, so startup aborts instead.
#[derive(Debug)]
pub enum GlintError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// GPU object creation failed (invalid or over-limit dimensions).
    Allocation {
        /// Debug label of the object that failed to allocate.
        label: String,
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// Render-target attachment configuration is invalid.
    IncompleteTarget {
        /// Debug label of the target.
        label: String,
    },
    /// WGSL composition or compilation failure.
    ShaderCompile {
        /// Shader file name as registered with the composer.
        name: String,
        /// Composer error message.
        message: String,
    },
    /// OBJ mesh data references out-of-bounds or invalid indices.
    MalformedMesh(String),
    /// Two texture bindings claim the same slot within one pass.
    SlotCollision(TextureSlot),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for GlintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Allocation {
                label,
                width,
                height,
            } => {
                write!(f, "allocation failed for '{label}' at {width}x{height}")
            }
            Self::IncompleteTarget { label } => {
                write!(f, "render target '{label}' is incomplete")
            }
            Self::ShaderCompile { name, message } => {
                write!(f, "shader '{name}' failed to compile: {message}")
            }
            Self::MalformedMesh(msg) => {
                write!(f, "malformed mesh: {msg}")
            }
            Self::SlotCollision(slot) => {
                write!(
                    f,
                    "texture slot {} bound twice in one pass",
                    slot.index()
                )
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for GlintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for GlintError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for GlintError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
