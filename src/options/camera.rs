use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Camera start position and control speeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
pub struct CameraOptions {
    /// Initial world-space position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Translation speed in units per second.
    #[schemars(title = "Move Speed", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub move_speed: f32,
    /// Rotation speed in radians per second.
    #[schemars(title = "Look Speed", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub look_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [0.0, 0.9, -1.6],
            move_speed: 1.5,
            look_speed: 1.2,
        }
    }
}
