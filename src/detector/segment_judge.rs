// WHY: Threshold arithmetic for a single segment, kept free of pattern matching so it can be tested on bare counts

use super::features::SegmentFeatures;
use super::{JudgementLabel, Thresholds};

/// Minimum gap between the two varieties' share of all markers for one side to dominate
const DOMINANCE_GAP: f64 = 0.9;

/// Classify one segment as Cantonese, SWC, Neutral or Mixed
pub fn judge_segment(features: &SegmentFeatures, thresholds: &Thresholds) -> JudgementLabel {
    judge_counts(
        features.cantonese_count(),
        features.swc_count(),
        features.han_length,
        thresholds,
    )
}

/// Same rule on raw counts
pub fn judge_counts(
    cantonese: usize,
    swc: usize,
    han_length: usize,
    thresholds: &Thresholds,
) -> JudgementLabel {
    // No Han characters, no linguistic signal
    if han_length == 0 {
        return JudgementLabel::Neutral;
    }

    let length = han_length as f64;
    let total = cantonese + swc;

    // Markers at or below tolerance are treated as noise
    let lack_cantonese = cantonese <= (thresholds.cantonese_tolerance * length).floor() as usize;
    let lack_swc = swc <= (thresholds.swc_tolerance * length).floor() as usize;

    if total == 0 || (lack_cantonese && lack_swc) {
        return JudgementLabel::Neutral;
    }

    let has_cantonese = cantonese >= (thresholds.cantonese_presence * length).ceil() as usize;
    let has_swc = swc >= (thresholds.swc_presence * length).ceil() as usize;

    let cantonese_share = cantonese as f64 / total as f64;
    let swc_share = swc as f64 / total as f64;
    let cantonese_dominant = cantonese_share - swc_share > DOMINANCE_GAP;
    let swc_dominant = swc_share - cantonese_share > DOMINANCE_GAP;

    if cantonese_dominant && !has_swc {
        JudgementLabel::Cantonese
    } else if swc_dominant && !has_cantonese {
        JudgementLabel::Swc
    } else {
        JudgementLabel::Mixed
    }
}
