use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bloom and tone-mapping parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Post-Processing", inline)]
#[serde(default)]
pub struct PostProcessingOptions {
    /// Run the bloom chain.
    #[schemars(title = "Bloom")]
    pub bloom: bool,
    /// Brightness threshold for the bloom prefilter.
    #[schemars(title = "Bloom Threshold", range(min = 0.5, max = 2.0), extend("step" = 0.05))]
    pub bloom_threshold: f32,
    /// Tent filter radius for the bloom upsample traversal, in uv space.
    #[schemars(title = "Bloom Filter Radius", range(min = 0.005, max = 0.01), extend("step" = 0.001))]
    pub bloom_filter_radius: f32,
    /// Mip chain length; construction-time only.
    #[schemars(skip)]
    pub bloom_mip_levels: usize,
    /// Scene-to-bloom blend factor in the composite pass.
    #[schemars(title = "Bloom Mix", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub bloom_mix: f32,
    /// Apply the ACES curve in the post pass.
    #[schemars(title = "Tonemap")]
    pub tonemap: bool,
    /// Linear exposure multiplier applied before tone mapping.
    #[schemars(title = "Exposure", range(min = 0.5, max = 2.0), extend("step" = 0.05))]
    pub exposure: f32,
}

impl Default for PostProcessingOptions {
    fn default() -> Self {
        Self {
            bloom: true,
            bloom_threshold: 1.0,
            bloom_filter_radius: 0.01,
            bloom_mip_levels: 8,
            bloom_mix: 0.2,
            tonemap: true,
            exposure: 1.0,
        }
    }
}
