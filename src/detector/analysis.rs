// WHY: Per-segment evidence collected during judgement, for reports and JSON output

use serde::Serialize;
use std::fmt::Write;

use super::features::{ratio, SegmentFeatures};
use super::JudgementLabel;

/// One evaluated segment and the label it received
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentAnalysis {
    pub features: SegmentFeatures,
    pub label: JudgementLabel,
}

/// Ordered segment analyses for one judged document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFeatures {
    pub split_segments: bool,
    pub split_quotes: bool,
    pub segments: Vec<SegmentAnalysis>,
    /// Index of the first quotes entry when matrix and quotes were judged separately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_start: Option<usize>,
}

/// Marker and Han totals over a run of segment analyses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureTotals {
    pub cantonese: usize,
    pub swc: usize,
    pub han: usize,
}

impl FeatureTotals {
    pub fn of(entries: &[SegmentAnalysis]) -> Self {
        entries.iter().fold(Self::default(), |totals, entry| Self {
            cantonese: totals.cantonese + entry.features.cantonese_count(),
            swc: totals.swc + entry.features.swc_count(),
            han: totals.han + entry.features.han_length,
        })
    }
}

impl DocumentFeatures {
    pub fn new(split_segments: bool, split_quotes: bool) -> Self {
        Self {
            split_segments,
            split_quotes,
            segments: Vec::new(),
            quote_start: None,
        }
    }

    pub fn push(&mut self, features: SegmentFeatures, label: JudgementLabel) {
        self.segments.push(SegmentAnalysis { features, label });
    }

    /// Concatenate a matrix record and a quotes record, matrix entries first
    pub fn merge(matrix: DocumentFeatures, quotes: DocumentFeatures, split_quotes: bool) -> Self {
        let quote_start = matrix.segments.len();
        let mut segments = matrix.segments;
        segments.extend(quotes.segments);
        Self {
            split_segments: matrix.split_segments,
            split_quotes,
            segments,
            quote_start: Some(quote_start),
        }
    }

    /// Matrix and quotes entries, for a record merged from two judged parts
    pub fn parts(&self) -> Option<(&[SegmentAnalysis], &[SegmentAnalysis])> {
        self.quote_start
            .filter(|&start| start <= self.segments.len())
            .map(|start| self.segments.split_at(start))
    }

    pub fn cantonese_total(&self) -> usize {
        self.segments.iter().map(|s| s.features.cantonese_count()).sum()
    }

    pub fn swc_total(&self) -> usize {
        self.segments.iter().map(|s| s.features.swc_count()).sum()
    }

    pub fn han_total(&self) -> usize {
        self.segments.iter().map(|s| s.features.han_length).sum()
    }

    /// Cantonese markers over Han characters across every evaluated segment
    pub fn cantonese_ratio(&self) -> f64 {
        ratio(self.cantonese_total(), self.han_total())
    }

    pub fn swc_ratio(&self) -> f64 {
        ratio(self.swc_total(), self.han_total())
    }

    /// Human-readable report: configuration header then one block per segment
    pub fn report(&self) -> String {
        let mut out = String::new();
        // WHY: writing into a String cannot fail, so the fmt::Result is discarded
        let _ = writeln!(out, "------------------------------------");
        let _ = writeln!(out, "Splitting quotes: {}", self.split_quotes);
        let _ = writeln!(out, "Splitting segments: {}", self.split_segments);
        let _ = writeln!(out);
        let _ = writeln!(out, "----------Segment Features----------");

        for analysis in &self.segments {
            let features = &analysis.features;
            let _ = writeln!(out, "Segment: {}", features.segment);
            let _ = writeln!(out, "Judgement: {}", analysis.label);
            let _ = writeln!(out, "Cantonese features: {}", features.cantonese.markers.join(", "));
            let _ = writeln!(out, "Cantonese content: {:.2}%", features.cantonese_ratio() * 100.0);
            let _ = writeln!(out, "SWC features: {}", features.swc.markers.join(", "));
            let _ = writeln!(out, "SWC content: {:.2}%", features.swc_ratio() * 100.0);
            let _ = writeln!(out);
        }

        out
    }
}

/// `count/total (pp.pp%)`, or `N/A` when there is nothing to divide by
pub fn format_ratio(count: usize, total: usize) -> String {
    if total == 0 {
        return "N/A".to_string();
    }
    format!("{count}/{total} ({:.2}%)", count as f64 / total as f64 * 100.0)
}
