//! Progressively halved render-texture chain used by the bloom pass.

use crate::error::GlintError;
use crate::gpu::render_context::RenderContext;
use crate::renderer::target::validate_dimensions;

/// One level of the chain: a render texture at a fixed resolution.
pub struct MipLevel {
    /// Level width in pixels.
    pub width: u32,
    /// Level height in pixels.
    pub height: u32,
    /// Backing texture.
    pub texture: wgpu::Texture,
    /// Render/sample view into the texture.
    pub view: wgpu::TextureView,
}

/// Fixed-length sequence of halved-resolution render textures.
///
/// Level 0 is the full base resolution; level i is
/// `max(1, base >> i)` per axis, so repeated floor-halving never
/// reaches zero.
pub struct MipChain {
    levels: Vec<MipLevel>,
    base_width: u32,
    base_height: u32,
    format: wgpu::TextureFormat,
}

/// Resolution of every level for a given base size.
#[must_use]
pub fn level_resolutions(
    base_width: u32,
    base_height: u32,
    level_count: usize,
) -> Vec<(u32, u32)> {
    (0..level_count)
        .map(|i| (1.max(base_width >> i), 1.max(base_height >> i)))
        .collect()
}

impl MipChain {
    /// Create a chain of `level_count` textures starting at the base
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] for a zero `level_count` or
    /// invalid base dimensions.
    pub fn new(
        context: &RenderContext,
        base_width: u32,
        base_height: u32,
        level_count: usize,
        format: wgpu::TextureFormat,
    ) -> Result<Self, GlintError> {
        if level_count == 0 {
            return Err(GlintError::Allocation {
                label: "Bloom Mip Chain".to_owned(),
                width: base_width,
                height: base_height,
            });
        }
        validate_dimensions(
            "Bloom Mip Chain",
            base_width,
            base_height,
            context.max_texture_dimension(),
        )?;

        let levels =
            Self::create_levels(context, base_width, base_height, level_count, format);

        Ok(Self {
            levels,
            base_width,
            base_height,
            format,
        })
    }

    fn create_levels(
        context: &RenderContext,
        base_width: u32,
        base_height: u32,
        level_count: usize,
        format: wgpu::TextureFormat,
    ) -> Vec<MipLevel> {
        level_resolutions(base_width, base_height, level_count)
            .into_iter()
            .enumerate()
            .map(|(i, (width, height))| {
                let texture =
                    context.device.create_texture(&wgpu::TextureDescriptor {
                        label: Some(&format!("Bloom Mip {i}")),
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
                MipLevel {
                    width,
                    height,
                    texture,
                    view,
                }
            })
            .collect()
    }

    /// Recompute every level from a new base resolution.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Allocation`] for invalid base dimensions.
    pub fn resize(
        &mut self,
        context: &RenderContext,
        base_width: u32,
        base_height: u32,
    ) -> Result<(), GlintError> {
        if base_width == self.base_width && base_height == self.base_height {
            return Ok(());
        }
        validate_dimensions(
            "Bloom Mip Chain",
            base_width,
            base_height,
            context.max_texture_dimension(),
        )?;

        self.levels = Self::create_levels(
            context,
            base_width,
            base_height,
            self.levels.len(),
            self.format,
        );
        self.base_width = base_width;
        self.base_height = base_height;
        Ok(())
    }

    /// Level at index `i`.
    #[must_use]
    pub fn level(&self, i: usize) -> &MipLevel {
        &self.levels[i]
    }

    /// All levels, largest first.
    #[must_use]
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if the chain holds no levels (never constructible).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolutions_halve_with_floor() {
        let res = level_resolutions(1920, 1080, 8);
        assert_eq!(res[0], (1920, 1080));
        assert_eq!(res[1], (960, 540));
        assert_eq!(res[2], (480, 270));
        assert_eq!(res[3], (240, 135));
        assert_eq!(res[4], (120, 67));
        assert_eq!(res[5], (60, 33));
        assert_eq!(res[6], (30, 16));
        assert_eq!(res[7], (15, 8));
    }

    #[test]
    fn resolutions_clamp_to_one() {
        let res = level_resolutions(4, 3, 6);
        assert_eq!(res[2], (1, 1));
        assert_eq!(res[5], (1, 1));
        assert!(res.iter().all(|&(w, h)| w >= 1 && h >= 1));
    }

    #[test]
    fn resolutions_non_increasing() {
        let res = level_resolutions(1279, 719, 10);
        for pair in res.windows(2) {
            assert!(pair[1].0 <= pair[0].0);
            assert!(pair[1].1 <= pair[0].1);
        }
    }
}
