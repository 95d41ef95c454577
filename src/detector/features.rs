// WHY: Per-segment marker counting separated from judgement so reports can reuse the raw evidence

use serde::Serialize;
use std::ops::Range;

use super::lexicon::{Lexicon, Variety};

/// Marker evidence for one variety within a segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkerEvidence {
    /// Every marker match, in text order
    pub markers: Vec<String>,
    /// Every exclusion match, in text order
    pub exclusions: Vec<String>,
    /// Marker matches minus exclusion matches, floored at zero
    pub count: usize,
}

impl MarkerEvidence {
    fn collect(lexicon: &Lexicon, variety: Variety, segment: &str) -> Self {
        let markers: Vec<String> = matched_text(segment, lexicon.marker_spans(variety, segment));
        let exclusions: Vec<String> = matched_text(segment, lexicon.exclusion_spans(variety, segment));

        // Each exclusion match cancels one marker match, whether or not the two overlap
        let count = markers.len().saturating_sub(exclusions.len());

        Self {
            markers,
            exclusions,
            count,
        }
    }

    /// Raw marker matches before exclusions are applied
    pub fn raw_count(&self) -> usize {
        self.markers.len()
    }
}

/// Features extracted from one evaluated segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentFeatures {
    /// The exact text that was evaluated
    pub segment: String,
    pub cantonese: MarkerEvidence,
    pub swc: MarkerEvidence,
    /// Number of Han characters; 0 when the segment has none
    pub han_length: usize,
}

impl SegmentFeatures {
    /// Scan a segment against the lexicon. Total: any input yields well-formed features.
    pub fn extract(lexicon: &Lexicon, segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            cantonese: MarkerEvidence::collect(lexicon, Variety::Cantonese, segment),
            swc: MarkerEvidence::collect(lexicon, Variety::Swc, segment),
            han_length: lexicon.han_length(segment),
        }
    }

    pub fn cantonese_count(&self) -> usize {
        self.cantonese.count
    }

    pub fn swc_count(&self) -> usize {
        self.swc.count
    }

    pub fn cantonese_ratio(&self) -> f64 {
        ratio(self.cantonese.count, self.han_length)
    }

    pub fn swc_ratio(&self) -> f64 {
        ratio(self.swc.count, self.han_length)
    }
}

pub(crate) fn ratio(count: usize, han_length: usize) -> f64 {
    if han_length == 0 {
        0.0
    } else {
        count as f64 / han_length as f64
    }
}

fn matched_text(segment: &str, spans: Vec<Range<usize>>) -> Vec<String> {
    spans.into_iter().map(|span| segment[span].to_string()).collect()
}
