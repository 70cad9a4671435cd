//! Visual styling derived from magnitude: radius bands, severity tiers,
//! ring geometry
//!
//! Radius and color are pure functions of their inputs; identical inputs
//! always yield identical outputs.

/// Fractions of the base radius for the four concentric rings,
/// outermost first.
pub const RING_FRACTIONS: [f64; 4] = [1.0, 0.75, 0.5, 0.25];

/// Index of the single ring that carries the interactive popup.
///
/// Policy: innermost ring only. The popup belongs to the smallest
/// circle so it does not shadow clicks across the whole footprint.
pub const POPUP_RING_INDEX: usize = 3;

/// Base/alternate color pair for one severity tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierColor {
    pub base: &'static str,
    pub alt: &'static str,
}

/// Severity color table, indexed by tier (clamped `floor(magnitude)`).
///
/// A cool-to-hot ramp: tiers 0-3 greens, tier 4 yellow, then orange,
/// red, dark red for 7+. The alternate shade of each pair is slightly
/// darker, giving the even/odd ring striping.
pub const TIER_COLORS: [TierColor; 8] = [
    TierColor { base: "#00ff7f", alt: "#00e672" }, // 0: spring green
    TierColor { base: "#7fff00", alt: "#72e600" }, // 1: chartreuse
    TierColor { base: "#adff2f", alt: "#9ae62a" }, // 2: green-yellow
    TierColor { base: "#d4e157", alt: "#bfcb4e" }, // 3: lime
    TierColor { base: "#ffff00", alt: "#e6e600" }, // 4: yellow
    TierColor { base: "#ffa500", alt: "#e69400" }, // 5: orange
    TierColor { base: "#ff0000", alt: "#e60000" }, // 6: red
    TierColor { base: "#8b0000", alt: "#7a0000" }, // 7+: dark red
];

/// Map magnitude to its severity tier: `floor(magnitude)` clamped to the
/// table bounds.
pub fn tier(magnitude: f64) -> usize {
    (magnitude.floor() as i64).clamp(0, TIER_COLORS.len() as i64 - 1) as usize
}

/// Ring color for an event: the tier's base color on even ring indices,
/// the darker alternate on odd ones.
pub fn color(magnitude: f64, ring_index: usize) -> &'static str {
    let pair = TIER_COLORS[tier(magnitude)];
    if ring_index % 2 == 0 {
        pair.base
    } else {
        pair.alt
    }
}

/// Base color of a magnitude's tier, used for chart bars.
pub fn base_color(magnitude: f64) -> &'static str {
    TIER_COLORS[tier(magnitude)].base
}

/// Base circle radius in meters for a magnitude.
///
/// Piecewise exponential over four magnitude bands; the multiplier jumps
/// at each band boundary so visual size steepens sharply for the big
/// ones. Band boundaries are part of the contract.
pub fn radius(magnitude: f64) -> f64 {
    let scaled = 2.5_f64.powf(magnitude);
    if magnitude < 3.0 {
        scaled * 100.0
    } else if magnitude < 5.0 {
        scaled * 1000.0
    } else if magnitude < 7.0 {
        scaled * 1300.0
    } else {
        scaled * 2000.0
    }
}

/// Fill opacity for a ring: inner rings are more opaque.
pub fn ring_opacity(ring_index: usize) -> f64 {
    0.2 + ring_index as f64 * 0.2
}
