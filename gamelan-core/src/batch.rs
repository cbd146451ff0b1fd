//! # Batch Analysis
//!
//! Analyzes many independent f0 tracks on a small pool of worker threads.
//! Tracks are handed out through a channel and results come back through
//! another one; workers share only the read-only configuration.

use std::thread;

use crossbeam_channel::{bounded, unbounded};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::pipeline::{TuningAnalysis, analyze_with};
use crate::segmentation::StableRegionSegmenter;
use crate::tuning::TuningSimilarityComputer;

/// The analysis of one track from a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Position of the track in the input.
    pub index: usize,
    pub result: std::result::Result<TuningAnalysis, String>,
}

/// Analyzes every track in `tracks` using up to `workers` threads.
///
/// # Returns
/// * `Ok(outcomes)` - One outcome per track, ordered by track index. Failures
///   of individual tracks are reported in their outcome.
/// * `Err(Error::InvalidParameter)` - The configuration is unusable
pub fn analyze_batch(
    tracks: &[Vec<f64>],
    config: &AnalysisConfig,
    workers: usize,
) -> Result<Vec<BatchOutcome>> {
    config.validate()?;
    let segmenter = StableRegionSegmenter::new(config.segmenter.clone())?;
    let computer = TuningSimilarityComputer::new(config.tunings.clone());
    let workers = workers.clamp(1, tracks.len().max(1));

    let (job_tx, job_rx) = bounded::<(usize, &[f64])>(workers * 2);
    let (result_tx, result_rx) = unbounded::<BatchOutcome>();

    thread::scope(|scope| {
        for worker in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let segmenter = &segmenter;
            let computer = &computer;
            scope.spawn(move || {
                for (index, track) in job_rx.iter() {
                    let result = analyze_with(track, segmenter, computer, config)
                        .map_err(|e| e.to_string());
                    if let Err(e) = &result {
                        log::warn!("[BATCH] worker {worker}: track {index} failed: {e}");
                    }
                    // The receiver outlives every worker inside this scope.
                    let _ = result_tx.send(BatchOutcome { index, result });
                }
            });
        }
        drop(result_tx);

        for (index, track) in tracks.iter().enumerate() {
            if job_tx.send((index, track.as_slice())).is_err() {
                break;
            }
        }
        drop(job_tx);
    });

    let mut outcomes: Vec<BatchOutcome> = result_rx.try_iter().collect();
    outcomes.sort_by_key(|o| o.index);
    log::debug!(
        "[BATCH] analyzed {} tracks on {} workers",
        outcomes.len(),
        workers
    );
    Ok(outcomes)
}
