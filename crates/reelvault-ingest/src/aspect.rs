//! Aspect-ratio classification.

use reelvault_core::Orientation;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const RATIO_TOLERANCE: f64 = 0.01;

/// Classify stream geometry into a coarse orientation.
///
/// The ratio is compared against 16:9 first, then 9:16, with a fixed
/// absolute tolerance of 0.01 on the ratio; anything outside both bands is
/// `Other`. Ordering and tolerance are the entire classification rule.
pub fn classify(width: u32, height: u32) -> Orientation {
    let ratio = width as f64 / height as f64;

    if (ratio - LANDSCAPE_RATIO).abs() < RATIO_TOLERANCE {
        Orientation::Landscape
    } else if (ratio - PORTRAIT_RATIO).abs() < RATIO_TOLERANCE {
        Orientation::Portrait
    } else {
        Orientation::Other
    }
}
