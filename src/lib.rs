pub mod batch;
pub mod config;
pub mod detector;
pub mod output;
pub mod reader;

// Re-export main types for convenient access
pub use detector::{
    CantoneseDetector, DetectorConfig, DocumentFeatures, Judgement, JudgementLabel,
    PartJudgements, SegmentFeatures, Thresholds,
};

// Re-export batch helpers for benchmarking and external callers
pub use batch::{judge_documents, judge_documents_sequential};
