// WHY: Documents are independent, so a batch is judged in parallel chunks on the blocking pool
// Output order always matches input order

use anyhow::Result;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

use crate::detector::{CantoneseDetector, Judgement};

/// Judge every document on the calling thread
pub fn judge_documents_sequential(detector: &CantoneseDetector, documents: &[String]) -> Vec<Judgement> {
    documents.iter().map(|document| detector.evaluate(document)).collect()
}

/// Judge documents across all cores, one contiguous chunk per worker.
/// Workers share the batch, so the caller keeps its own handle for pairing texts with results.
pub async fn judge_documents(
    detector: &CantoneseDetector,
    documents: Arc<Vec<String>>,
) -> Result<Vec<Judgement>> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    let workers = num_cpus::get().max(1);
    let chunk_size = documents.len().div_ceil(workers);
    let total = documents.len();

    info!("Judging {} documents in chunks of {} across {} workers", total, chunk_size, workers);

    let tasks = (0..total).step_by(chunk_size).map(|start| {
        let end = (start + chunk_size).min(total);
        let detector = detector.clone();
        let documents = Arc::clone(&documents);
        tokio::task::spawn_blocking(move || {
            debug!("Judging documents {}..{}", start, end);
            documents[start..end]
                .iter()
                .map(|document| detector.evaluate(document))
                .collect::<Vec<_>>()
        })
    });

    let chunks = try_join_all(tasks).await?;
    Ok(chunks.into_iter().flatten().collect())
}
