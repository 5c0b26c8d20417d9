use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Temporal accumulation toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Accumulation", inline)]
#[serde(default)]
pub struct AccumulationOptions {
    /// Blend each frame into the history buffer instead of overwriting it.
    #[schemars(title = "Accumulate")]
    pub enabled: bool,
    /// Restart accumulation whenever the camera moves or rotates.
    #[schemars(title = "Reset On Camera Move")]
    pub reset_on_camera_move: bool,
}

impl Default for AccumulationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            reset_on_camera_move: false,
        }
    }
}
