//! Output sizing for live image revisions.
//!
//! The generation service accepts a fixed set of aspect ratios. A source's
//! natural size is snapped to the closest supported ratio and mapped to
//! that ratio's canonical output dimensions.

use serde::Serialize;

/// Supported aspect ratios: `(label, width / height, output width, output height)`.
const SUPPORTED_RATIOS: &[(&str, f64, u32, u32)] = &[
    ("1:1", 1.0, 1024, 1024),
    ("3:2", 1.5, 1248, 832),
    ("2:3", 0.66, 832, 1248),
    ("3:4", 0.75, 896, 1152),
    ("4:3", 1.33, 1152, 896),
    ("4:5", 0.8, 896, 1088),
    ("5:4", 1.25, 1088, 896),
    ("9:16", 0.56, 720, 1280),
    ("16:9", 1.77, 1280, 720),
    ("21:9", 2.33, 1536, 640),
];

/// Output size requested from the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetDimensions {
    pub aspect_ratio: &'static str,
    pub width: u32,
    pub height: u32,
}

impl Default for TargetDimensions {
    fn default() -> Self {
        Self {
            aspect_ratio: "1:1",
            width: 1024,
            height: 1024,
        }
    }
}

/// Snap a natural size to the closest supported ratio.
///
/// Ties keep the earlier entry. A zero dimension falls back to square.
pub fn target_dimensions(natural_width: u32, natural_height: u32) -> TargetDimensions {
    if natural_width == 0 || natural_height == 0 {
        return TargetDimensions::default();
    }
    let ratio = f64::from(natural_width) / f64::from(natural_height);

    let mut best = SUPPORTED_RATIOS[0];
    for candidate in &SUPPORTED_RATIOS[1..] {
        if (candidate.1 - ratio).abs() < (best.1 - ratio).abs() {
            best = *candidate;
        }
    }

    TargetDimensions {
        aspect_ratio: best.0,
        width: best.2,
        height: best.3,
    }
}
