//! Off-screen render target: one color attachment plus an optional
//! combined depth/stencil attachment.

use crate::error::GlintError;
use crate::gpu::render_context::RenderContext;

/// Combined depth/stencil format used by targets that request depth.
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Depth24PlusStencil8;

/// An off-screen color target with an optional depth/stencil attachment.
///
/// Invalid dimensions are a hard error at creation and resize; a target
/// that silently failed to allocate would render garbage for the rest of
/// the pipeline.
pub struct RenderTarget {
    label: String,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: Option<wgpu::Texture>,
    depth_view: Option<wgpu::TextureView>,
}

/// Check target dimensions against device limits.
///
/// # Errors
///
/// Returns [`GlintError::Allocation`] when either dimension is zero or
/// exceeds `max_dimension`.
pub fn validate_dimensions(
    label: &str,
    width: u32,
    height: u32,
    max_dimension: u32,
) -> Result<(), GlintError> {
    if width == 0 || height == 0 || width > max_dimension || height > max_dimension {
        return Err(GlintError::Allocation {
            label: label.to_owned(),
            width,
            height,
        });
    }
    Ok(())
}

impl RenderTarget {
    /// Create a render target.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] for zero or over-limit
    /// dimensions.
    pub fn new(
        context: &RenderContext,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        with_depth_stencil: bool,
    ) -> Result<Self, GlintError> {
        validate_dimensions(label, width, height, context.max_texture_dimension())?;

        let (color_texture, color_view) =
            Self::create_color(context, label, width, height, format);
        let (depth_texture, depth_view) = if with_depth_stencil {
            let (t, v) = Self::create_depth(context, label, width, height);
            (Some(t), Some(v))
        } else {
            (None, None)
        };

        let target = Self {
            label: label.to_owned(),
            width,
            height,
            format,
            color_texture,
            color_view,
            depth_texture,
            depth_view,
        };
        target.ensure_complete()?;
        Ok(target)
    }

    fn create_color(
        context: &RenderContext,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        (texture, view)
    }

    fn create_depth(
        context: &RenderContext,
        label: &str,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Depth/Stencil")),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_STENCIL_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        (texture, view)
    }

    /// Reallocate backing storage for a new size. A resize to the current
    /// size is a no-op, preserving attachment identity.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] for invalid dimensions.
    pub fn resize(
        &mut self,
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<(), GlintError> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        validate_dimensions(&self.label, width, height, context.max_texture_dimension())?;

        let (color_texture, color_view) =
            Self::create_color(context, &self.label, width, height, self.format);
        self.color_texture = color_texture;
        self.color_view = color_view;

        if self.depth_texture.is_some() {
            let (t, v) = Self::create_depth(context, &self.label, width, height);
            self.depth_texture = Some(t);
            self.depth_view = Some(v);
        }

        self.width = width;
        self.height = height;
        self.ensure_complete()
    }

    fn ensure_complete(&self) -> Result<(), GlintError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(GlintError::IncompleteTarget {
                label: self.label.clone(),
            })
        }
    }

    /// Attachment dimensions match the recorded size.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let color_ok = self.color_texture.width() == self.width
            && self.color_texture.height() == self.height;
        let depth_ok = self.depth_texture.as_ref().is_none_or(|t| {
            t.width() == self.width && t.height() == self.height
        });
        color_ok && depth_ok
    }

    /// The color attachment view.
    #[must_use]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// The depth/stencil attachment view, if this target has one.
    #[must_use]
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_view.as_ref()
    }

    /// Target width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color attachment format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_rejected() {
        assert!(validate_dimensions("t", 0, 1080, 8192).is_err());
        assert!(validate_dimensions("t", 1920, 0, 8192).is_err());
    }

    #[test]
    fn over_limit_dimensions_rejected() {
        let err = validate_dimensions("t", 16384, 1080, 8192).unwrap_err();
        assert!(matches!(
            err,
            GlintError::Allocation { width: 16384, height: 1080, .. }
        ));
    }

    #[test]
    fn incomplete_target_error_names_the_target() {
        let err = GlintError::IncompleteTarget {
            label: "Scene Color".to_owned(),
        };
        assert!(err.to_string().contains("Scene Color"));
    }

    #[test]
    fn valid_dimensions_accepted() {
        assert!(validate_dimensions("t", 1, 1, 8192).is_ok());
        assert!(validate_dimensions("t", 8192, 8192, 8192).is_ok());
        assert!(validate_dimensions("t", 1920, 1080, 8192).is_ok());
    }
}
