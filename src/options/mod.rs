//! Centralized rendering/display options with TOML preset support.
//!
//! All tweakable settings (accumulation, post-processing, camera,
//! display) are consolidated here. Options serialize to/from TOML, and
//! every sub-struct uses `#[serde(default)]` so partial files work.

mod accumulation;
mod camera;
mod display;
mod post_processing;

use std::path::Path;

pub use accumulation::AccumulationOptions;
pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use post_processing::PostProcessingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GlintError;

/// Top-level options container. All sub-structs use `#[serde(default)]`
/// so partial TOML files (e.g. only overriding `[post_processing]`)
/// work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Temporal accumulation toggles.
    pub accumulation: AccumulationOptions,
    /// Bloom and tone-mapping parameters.
    pub post_processing: PostProcessingOptions,
    /// Camera start position and control speeds.
    pub camera: CameraOptions,
    /// Presentation and frame pacing settings.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Io`] or [`GlintError::OptionsParse`].
    pub fn load(path: &Path) -> Result<Self, GlintError> {
        let content = std::fs::read_to_string(path).map_err(GlintError::Io)?;
        toml::from_str(&content)
            .map_err(|e| GlintError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Io`] or [`GlintError::OptionsParse`].
    pub fn save(&self, path: &Path) -> Result<(), GlintError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlintError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GlintError::Io)?;
        }
        std::fs::write(path, content).map_err(GlintError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[post_processing]
bloom_threshold = 1.5
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.post_processing.bloom_threshold, 1.5);
        // Everything else should be default
        assert!(opts.post_processing.bloom);
        assert_eq!(opts.post_processing.bloom_mip_levels, 8);
        assert!(opts.accumulation.enabled);
        assert!(!opts.accumulation.reset_on_camera_move);
        assert!(opts.display.vsync);
    }

    #[test]
    fn defaults_match_reference_values() {
        let opts = Options::default();
        assert_eq!(opts.post_processing.bloom_filter_radius, 0.01);
        assert_eq!(opts.post_processing.bloom_mix, 0.2);
        assert_eq!(opts.camera.position, [0.0, 0.9, -1.6]);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("accumulation"));
        assert!(props.contains_key("post_processing"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("display"));

        // Skipped fields should be absent from the schema
        let pp = &props["post_processing"]["properties"];
        assert!(pp.get("bloom_threshold").is_some());
        assert!(pp.get("bloom_mip_levels").is_none());
        let camera = &props["camera"]["properties"];
        assert!(camera.get("position").is_none());
    }
}
