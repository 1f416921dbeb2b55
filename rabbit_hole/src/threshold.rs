//! Threshold policy - how good an answer has to be at a given depth.
//!
//! Two independent thresholds live here:
//!
//! - the **continuation threshold**, a configurable linear ramp that gates
//!   whether a rabbit hole opens after an answer;
//! - the **plausibility floor**, a fixed curve that decides which decoy
//!   recipes are worth offering at a depth.

use crate::config::SessionConfig;

/// Absorbs floating point drift in `floor + ramp * depth` style sums.
pub const THRESHOLD_EPSILON: f64 = 1e-9;

/// Plausibility floor at depth 0.
pub const CORE_PLAUSIBILITY_FLOOR: f64 = 0.2;
/// Plausibility floor base for depth >= 1.
pub const PLAUSIBILITY_FLOOR_BASE: f64 = 0.5;
/// Plausibility floor increase per depth level.
pub const PLAUSIBILITY_FLOOR_RAMP: f64 = 0.05;
/// The floor never exceeds this, so near-miss herrings stay on offer.
pub const PLAUSIBILITY_FLOOR_CAP: f64 = 0.9;

/// Score needed to continue a rabbit hole at `depth`, clamped to 1.0.
pub fn required_threshold(depth: u32, config: &SessionConfig) -> f64 {
    (config.base_coherence_floor + config.coherence_ramp * depth as f64).min(1.0)
}

/// Minimum plausibility a herring needs to be offered at `depth`.
pub fn plausibility_floor(depth: u32) -> f64 {
    if depth == 0 {
        return CORE_PLAUSIBILITY_FLOOR;
    }
    (PLAUSIBILITY_FLOOR_BASE + PLAUSIBILITY_FLOOR_RAMP * depth as f64).min(PLAUSIBILITY_FLOOR_CAP)
}

/// Inclusive comparison against a threshold.
pub fn meets_threshold(value: f64, threshold: f64) -> bool {
    value + THRESHOLD_EPSILON >= threshold
}
