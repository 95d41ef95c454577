// WHY: Main detector interface; composes quote splitting, segmentation, extraction, judgement and aggregation
// Everything below the public entry points is pure and synchronous

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub mod aggregator;
pub mod analysis;
pub mod features;
pub mod lexicon;
pub mod quotes;
pub mod segment_judge;
pub mod segmentation;

// Re-export core types
pub use aggregator::{aggregate, LabelCounts};
pub use analysis::{format_ratio, DocumentFeatures, FeatureTotals, SegmentAnalysis};
pub use features::{MarkerEvidence, SegmentFeatures};
pub use lexicon::{Lexicon, Variety, QUOTE_PLACEHOLDER};
pub use quotes::{separate_quotes, QuoteSplit};
pub use segment_judge::{judge_counts, judge_segment};
pub use segmentation::split_segments;

/// Verdict for a segment, a part of a document, or a whole document.
/// Segment-level judgements only ever produce the first four variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgementLabel {
    Cantonese,
    Swc,
    Neutral,
    Mixed,
    /// Narration in SWC, quoted speech in Cantonese
    CantoneseQuotesInSwc,
    /// Narration in SWC, quoted speech mixed
    MixedQuotesInSwc,
}

impl JudgementLabel {
    pub const ALL: [JudgementLabel; 6] = [
        JudgementLabel::Cantonese,
        JudgementLabel::Swc,
        JudgementLabel::Neutral,
        JudgementLabel::Mixed,
        JudgementLabel::CantoneseQuotesInSwc,
        JudgementLabel::MixedQuotesInSwc,
    ];

    /// Stable external name
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgementLabel::Cantonese => "cantonese",
            JudgementLabel::Swc => "swc",
            JudgementLabel::Neutral => "neutral",
            JudgementLabel::Mixed => "mixed",
            JudgementLabel::CantoneseQuotesInSwc => "cantonese_quotes_in_swc",
            JudgementLabel::MixedQuotesInSwc => "mixed_quotes_in_swc",
        }
    }

    /// True for the four labels a single segment can receive
    pub fn is_segment_level(&self) -> bool {
        matches!(
            self,
            JudgementLabel::Cantonese
                | JudgementLabel::Swc
                | JudgementLabel::Neutral
                | JudgementLabel::Mixed
        )
    }
}

impl fmt::Display for JudgementLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JudgementLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        JudgementLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown judgement label: {s}"))
    }
}

/// Density thresholds, each a fraction of the segment's Han length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Cantonese markers at or below this share are noise
    pub cantonese_tolerance: f64,
    /// SWC markers at or below this share are noise
    pub swc_tolerance: f64,
    /// Cantonese markers at or above this share count as present
    pub cantonese_presence: f64,
    /// SWC markers at or above this share count as present
    pub swc_presence: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cantonese_tolerance: 0.01,
            swc_tolerance: 0.01,
            cantonese_presence: 0.03,
            swc_presence: 0.03,
        }
    }
}

impl Thresholds {
    /// Every threshold must lie strictly between 0 and 1
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("cantonese_tolerance", self.cantonese_tolerance),
            ("swc_tolerance", self.swc_tolerance),
            ("cantonese_presence", self.cantonese_presence),
            ("swc_presence", self.swc_presence),
        ];
        for (name, value) in named {
            if !(value > 0.0 && value < 1.0) {
                bail!("Threshold {name} must be in (0, 1), got {value}");
            }
        }
        Ok(())
    }
}

/// Detector configuration, fixed for the detector's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetectorConfig {
    /// Judge each delimiter-bounded clause, then aggregate
    pub split_segments: bool,
    /// Judge quoted speech and narration separately, then reconcile
    pub split_quotes: bool,
    /// Collect per-segment features in `evaluate`
    pub analysis: bool,
    pub thresholds: Thresholds,
}

/// Labels of the two independently judged parts of a quoted document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartJudgements {
    pub matrix: JudgementLabel,
    pub quotes: JudgementLabel,
}

impl PartJudgements {
    /// Combine narration and speech verdicts into the final six-way label
    pub fn reconcile(&self) -> JudgementLabel {
        use JudgementLabel::*;
        match (self.matrix, self.quotes) {
            (matrix, quotes) if matrix == quotes => matrix,
            (Neutral, quotes) => quotes,
            (matrix, Neutral) => matrix,
            (Swc, Cantonese) => CantoneseQuotesInSwc,
            (Swc, Mixed) => MixedQuotesInSwc,
            _ => Mixed,
        }
    }
}

/// Label plus the analysis record when the detector was configured for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Judgement {
    pub label: JudgementLabel,
    pub features: Option<DocumentFeatures>,
}

/// Document-level Cantonese / SWC detector
#[derive(Debug, Clone)]
pub struct CantoneseDetector {
    config: DetectorConfig,
    lexicon: &'static Lexicon,
}

impl CantoneseDetector {
    /// Create a detector over the shared lexicon
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.thresholds.validate()?;
        Ok(Self {
            config,
            lexicon: Lexicon::shared()?,
        })
    }

    /// Whole-document judgement with default thresholds and no splitting
    pub fn with_default_config() -> Result<Self> {
        Self::new(DetectorConfig::default())
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &'static Lexicon {
        self.lexicon
    }

    /// Judge a document
    pub fn judge(&self, document: &str) -> JudgementLabel {
        debug!("Judging document of {} bytes", document.len());
        self.judge_document(document, false).0
    }

    /// Judge a document and return every evaluated segment's features
    pub fn judge_with_analysis(&self, document: &str) -> (JudgementLabel, DocumentFeatures) {
        debug!("Judging document of {} bytes with analysis", document.len());
        let (label, features) = self.judge_document(document, true);
        let features = features.unwrap_or_else(|| self.empty_record());
        (label, features)
    }

    /// Judge a document, collecting features only when the config asks for analysis
    pub fn evaluate(&self, document: &str) -> Judgement {
        if self.config.analysis {
            let (label, features) = self.judge_with_analysis(document);
            Judgement {
                label,
                features: Some(features),
            }
        } else {
            Judgement {
                label: self.judge(document),
                features: None,
            }
        }
    }

    /// Matrix and quotes labels when the document has both narration and quoted speech.
    /// Splits quotes regardless of `split_quotes`; `None` when either part is absent.
    pub fn judge_parts(&self, document: &str) -> Option<PartJudgements> {
        let split = separate_quotes(self.lexicon, document);
        if split.matrix_is_placeholder_only() || split.quotes.is_empty() {
            return None;
        }
        Some(PartJudgements {
            matrix: self.judge_part(&split.matrix, None),
            quotes: self.judge_part(&split.quotes, None),
        })
    }

    fn empty_record(&self) -> DocumentFeatures {
        DocumentFeatures::new(self.config.split_segments, self.config.split_quotes)
    }

    fn judge_document(&self, document: &str, collect: bool) -> (JudgementLabel, Option<DocumentFeatures>) {
        if !self.config.split_quotes {
            return self.judge_collected(document, collect);
        }

        let split = separate_quotes(self.lexicon, document);

        if split.matrix_is_placeholder_only() {
            // The whole document is one quotation
            return self.judge_collected(&split.quotes, collect);
        }
        if split.quotes.is_empty() {
            return self.judge_collected(&split.matrix, collect);
        }

        let (matrix, matrix_record) = self.judge_collected(&split.matrix, collect);
        let (quotes, quotes_record) = self.judge_collected(&split.quotes, collect);
        let label = PartJudgements { matrix, quotes }.reconcile();

        debug!(%matrix, %quotes, %label, "Reconciled matrix and quotes");

        let record = match (matrix_record, quotes_record) {
            (Some(matrix_record), Some(quotes_record)) => Some(DocumentFeatures::merge(
                matrix_record,
                quotes_record,
                self.config.split_quotes,
            )),
            _ => None,
        };
        (label, record)
    }

    fn judge_collected(&self, text: &str, collect: bool) -> (JudgementLabel, Option<DocumentFeatures>) {
        if collect {
            let mut record = self.empty_record();
            let label = self.judge_part(text, Some(&mut record));
            (label, Some(record))
        } else {
            (self.judge_part(text, None), None)
        }
    }

    /// One independent judgement: segmented and aggregated, or the whole text as one segment
    fn judge_part(&self, text: &str, mut record: Option<&mut DocumentFeatures>) -> JudgementLabel {
        if self.config.split_segments {
            let labels: Vec<JudgementLabel> = split_segments(self.lexicon, text)
                .into_iter()
                .map(|segment| self.judge_single(segment, record.as_deref_mut()))
                .collect();
            aggregate(labels)
        } else {
            self.judge_single(text, record)
        }
    }

    fn judge_single(&self, segment: &str, record: Option<&mut DocumentFeatures>) -> JudgementLabel {
        let features = SegmentFeatures::extract(self.lexicon, segment);
        let label = judge_segment(&features, &self.config.thresholds);
        if let Some(record) = record {
            record.push(features, label);
        }
        label
    }
}
