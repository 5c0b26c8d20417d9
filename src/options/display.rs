use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Presentation and frame pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
pub struct DisplayOptions {
    /// Block presentation on the display refresh (Fifo vs Immediate).
    #[schemars(title = "VSync")]
    pub vsync: bool,
    /// Frame-rate cap when positive; 0 renders as fast as possible.
    #[schemars(title = "Target FPS", range(min = 0, max = 240))]
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            vsync: true,
            target_fps: 0,
        }
    }
}
