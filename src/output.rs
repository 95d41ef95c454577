// WHY: Output-line formatting and run statistics, kept out of main so tests can drive them directly

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::detector::{format_ratio, DocumentFeatures, FeatureTotals, Judgement, JudgementLabel};

/// What each output line carries besides the label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Append tab-separated Cantonese and SWC ratios
    pub with_ratios: bool,
    /// Append the original text after a tab
    pub with_text: bool,
    /// Print the per-segment report before the line
    pub with_report: bool,
    /// Only emit documents with this label
    pub label_filter: Option<JudgementLabel>,
}

/// Render one document's output, or `None` when the label filter drops it
pub fn render_entry(judgement: &Judgement, text: &str, options: &OutputOptions) -> Option<String> {
    if let Some(wanted) = options.label_filter {
        if judgement.label != wanted {
            return None;
        }
    }

    let mut entry = String::new();

    if options.with_report {
        if let Some(features) = &judgement.features {
            entry.push_str(&features.report());
        }
    }

    entry.push_str(judgement.label.as_str());

    if options.with_ratios {
        let (cantonese, swc) = match &judgement.features {
            Some(features) => ratio_columns(features),
            None => ("N/A".to_string(), "N/A".to_string()),
        };
        entry.push('\t');
        entry.push_str(&cantonese);
        entry.push('\t');
        entry.push_str(&swc);
    }

    if options.with_text {
        entry.push('\t');
        entry.push_str(text);
    }

    entry.push('\n');
    Some(entry)
}

/// Cantonese and SWC ratio columns; `[M]..:[Q]..` when matrix and quotes were judged apart
fn ratio_columns(features: &DocumentFeatures) -> (String, String) {
    match features.parts() {
        Some((matrix, quotes)) => {
            let matrix = FeatureTotals::of(matrix);
            let quotes = FeatureTotals::of(quotes);
            (
                format!(
                    "[M]{}:[Q]{}",
                    format_ratio(matrix.cantonese, matrix.han),
                    format_ratio(quotes.cantonese, quotes.han)
                ),
                format!(
                    "[M]{}:[Q]{}",
                    format_ratio(matrix.swc, matrix.han),
                    format_ratio(quotes.swc, quotes.han)
                ),
            )
        }
        None => (
            format_ratio(features.cantonese_total(), features.han_total()),
            format_ratio(features.swc_total(), features.han_total()),
        ),
    }
}

/// Write rendered entries through a buffered writer
pub async fn write_entries<W>(writer: W, entries: &[String]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = BufWriter::new(writer);
    for entry in entries {
        writer.write_all(entry.as_bytes()).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Write entries to a file, or to stdout when no path is given
pub async fn write_output(path: Option<&Path>, entries: &[String]) -> Result<()> {
    match path {
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output {}", path.display()))?;
            write_entries(file, entries).await
        }
        None => write_entries(tokio::io::stdout(), entries).await,
    }
}

/// Summary of one CLI run
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunStats {
    /// Unix timestamp (seconds) when the run started
    pub run_start: u64,
    pub input_path: String,
    pub lines_read: u64,
    pub lines_written: u64,
    /// Documents per label, keyed by the label's external name
    pub label_counts: BTreeMap<String, u64>,
    pub read_time_ms: u64,
    pub judge_time_ms: u64,
    pub total_processing_time_ms: u64,
    /// Read error if the input was only partially read
    pub read_error: Option<String>,
}

impl RunStats {
    pub fn record_labels<'a, I>(&mut self, judgements: I)
    where
        I: IntoIterator<Item = &'a Judgement>,
    {
        for judgement in judgements {
            *self
                .label_counts
                .entry(judgement.label.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write stats {}", path.display()))?;
        Ok(())
    }
}
