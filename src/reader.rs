use anyhow::{bail, Context, Result};
use std::path::Path;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Configuration for input reading behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderConfig {
    /// Whether to fail fast on a read error or keep the lines read so far
    pub fail_fast: bool,
}

/// Statistics for one input file
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Async reader that yields one document per input line
pub struct DocumentReader {
    config: ReaderConfig,
}

impl DocumentReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read every line of the file as a trimmed document.
    /// Blank lines are kept so output lines stay aligned with input lines.
    pub async fn read_documents<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<(Vec<String>, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = Instant::now();

        debug!("Starting async read of input: {}", path.display());

        // WHY: a missing input leaves nothing to judge, so this fails regardless of fail_fast
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open input {}", path.display()))?;

        let mut lines = BufReader::new(file).lines();
        let mut documents = Vec::new();
        let mut stats = ReadStats {
            file_path: path.display().to_string(),
            lines_read: 0,
            bytes_read: 0,
            duration_ms: 0,
            read_error: None,
        };

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    stats.bytes_read += line.len() as u64 + 1; // +1 for newline
                    stats.lines_read += 1;
                    documents.push(line.trim().to_string());
                }
                Ok(None) => break,
                Err(e) => {
                    let error_msg = format!(
                        "UTF-8 decoding error in {} at line {}: {}",
                        path.display(),
                        stats.lines_read + 1,
                        e
                    );
                    warn!("{}", error_msg);

                    if self.config.fail_fast {
                        bail!(error_msg);
                    }
                    // Keep the lines before the bad one
                    stats.read_error = Some(error_msg);
                    break;
                }
            }
        }

        stats.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Read {}: {} lines, {} bytes in {}ms",
            path.display(),
            stats.lines_read,
            stats.bytes_read,
            stats.duration_ms
        );

        Ok((documents, stats))
    }
}
