use opack::PackConfig;
use serde::{Deserialize, Serialize};

/// Configuration of the driver, loadable from a JSON file.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
#[serde(default)]
pub struct MbbConfig {
    pub pack: PackConfig,
    pub svg: SvgOptions,
}

/// Rendering options for the solution SVG.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
#[serde(default)]
pub struct SvgOptions {
    /// Pixels per coordinate unit
    pub unit: f32,
    pub stroke_width: f32,
}

impl Default for SvgOptions {
    fn default() -> Self {
        SvgOptions { unit: 32.0, stroke_width: 1.0 }
    }
}
