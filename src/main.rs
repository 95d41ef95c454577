use anyhow::Result;
use cantodetect::config::{resolve_thresholds, SettingsFile, ThresholdOverrides};
use cantodetect::output::{render_entry, write_output, OutputOptions, RunStats};
use cantodetect::reader::{DocumentReader, ReaderConfig};
use cantodetect::{judge_documents, CantoneseDetector, DetectorConfig, JudgementLabel};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Label only (plus ratios with --stat)
    Judgement,
    /// Label followed by the original line
    Full,
}

#[derive(Parser, Debug)]
#[command(name = "cantodetect")]
#[command(about = "Judge each line of a Traditional Chinese text file as Cantonese, SWC, mixed or neutral")]
#[command(version)]
struct Args {
    /// Input text file, one document per line
    #[arg(long, default_value = "input.txt")]
    input: PathBuf,

    /// Output mode
    #[arg(long, value_enum, default_value_t = Mode::Judgement)]
    mode: Mode,

    /// Only output lines with this label (`all` keeps everything)
    #[arg(long, default_value = "all", value_parser = parse_label_filter)]
    label: LabelFilter,

    /// Append Cantonese and SWC marker ratios to each line
    #[arg(long)]
    stat: bool,

    /// Print the per-segment analysis before each line
    #[arg(long)]
    fullstat: bool,

    /// Judge quoted speech and narration separately
    #[arg(long)]
    quotes: bool,

    /// Split each document into clauses and aggregate their judgements
    #[arg(long)]
    split: bool,

    /// TOML settings file with a [thresholds] table
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    canto_tolerance: Option<f64>,

    #[arg(long)]
    swc_tolerance: Option<f64>,

    #[arg(long)]
    canto_presence: Option<f64>,

    #[arg(long)]
    swc_presence: Option<f64>,

    /// Write judgements here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Abort on the first read error instead of judging the lines read so far
    #[arg(long)]
    fail_fast: bool,
}

/// `None` keeps every label
#[derive(Debug, Clone, Copy)]
struct LabelFilter(Option<JudgementLabel>);

fn parse_label_filter(value: &str) -> Result<LabelFilter, String> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(LabelFilter(None));
    }
    value
        .parse::<JudgementLabel>()
        .map(|label| LabelFilter(Some(label)))
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging on stderr keeps stdout free for judgements
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    let run_start = Instant::now();

    info!(?args, "Parsed CLI arguments");

    let settings = match &args.config {
        Some(path) => Some(SettingsFile::load(path).await?),
        None => None,
    };
    let flags = ThresholdOverrides {
        cantonese_tolerance: args.canto_tolerance,
        swc_tolerance: args.swc_tolerance,
        cantonese_presence: args.canto_presence,
        swc_presence: args.swc_presence,
    };
    let thresholds = resolve_thresholds(settings.as_ref(), &flags)?;

    let detector = CantoneseDetector::new(DetectorConfig {
        split_segments: args.split,
        split_quotes: args.quotes,
        // WHY: ratios and reports both come from the per-segment record
        analysis: args.stat || args.fullstat,
        thresholds,
    })?;

    info!(?thresholds, "Detector ready");

    let reader = DocumentReader::new(ReaderConfig {
        fail_fast: args.fail_fast,
    });
    let (documents, read_stats) = reader.read_documents(&args.input).await?;
    let documents = Arc::new(documents);

    if let Some(ref error) = read_stats.read_error {
        warn!("Judging the {} lines read before: {}", documents.len(), error);
    }

    let judge_start = Instant::now();
    let judgements = judge_documents(&detector, Arc::clone(&documents)).await?;
    let judge_time_ms = judge_start.elapsed().as_millis() as u64;

    let options = OutputOptions {
        with_ratios: args.stat,
        with_text: args.mode == Mode::Full,
        with_report: args.fullstat,
        label_filter: args.label.0,
    };
    let entries: Vec<String> = judgements
        .iter()
        .zip(documents.iter())
        .filter_map(|(judgement, text)| render_entry(judgement, text, &options))
        .collect();

    write_output(args.output.as_deref(), &entries).await?;

    info!(
        "Judged {} lines in {}ms, wrote {}",
        judgements.len(),
        judge_time_ms,
        entries.len()
    );

    if let Some(stats_path) = &args.stats_out {
        let mut stats = RunStats {
            run_start: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
                .saturating_sub(run_start.elapsed().as_secs()),
            input_path: read_stats.file_path.clone(),
            lines_read: read_stats.lines_read,
            lines_written: entries.len() as u64,
            read_time_ms: read_stats.duration_ms,
            judge_time_ms,
            total_processing_time_ms: run_start.elapsed().as_millis() as u64,
            read_error: read_stats.read_error.clone(),
            ..RunStats::default()
        };
        stats.record_labels(&judgements);
        stats.write_json(stats_path).await?;
        info!("Wrote run stats to {}", stats_path.display());
    }

    Ok(())
}
