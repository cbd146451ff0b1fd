//! # Analysis Pipeline
//!
//! Runs a frame-wise f0 track through the whole chain:
//! 1. Segments the track into stable note regions
//! 2. Reduces each region to one representative frequency
//! 3. Groups the representatives into pitch classes
//! 4. Searches the pitch classes for a six-tone scale
//! 5. Scores the scale's intervals against the reference tunings

use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, Representative};
use crate::error::Result;
use crate::grouping::group_frequencies;
use crate::scale::{ScaleSearch, find_scale};
use crate::segmentation::{StableRegionSegmenter, StableSegment};
use crate::stability::select_stable_with_min_fragment;
use crate::stats::{mean, round2};
use crate::tuning::{SimilarityResult, TuningSimilarityComputer};

/// Everything the pipeline learned about one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningAnalysis {
    /// Stable regions of the input track.
    pub segments: Vec<StableSegment>,
    /// One voiced representative frequency per segment, in segment order.
    pub representatives: Vec<f64>,
    /// Ascending pitch classes.
    pub pitch_classes: Vec<f64>,
    /// Outcome of the scale search.
    pub scale: ScaleSearch,
    /// Similarity scores, present when a complete scale was found.
    pub similarity: Option<SimilarityResult>,
}

/// Analyzes one f0 track.
///
/// # Arguments
/// * `f0` - Frame-wise fundamental frequency in Hz
/// * `config` - Pipeline parameters
///
/// # Returns
/// * `Ok(analysis)` - The analysis, with or without a complete scale
/// * `Err(Error::EmptyInput)` - No voiced stable segment was found
/// * `Err(Error::InvalidParameter)` - The configuration is unusable
pub fn analyze(f0: &[f64], config: &AnalysisConfig) -> Result<TuningAnalysis> {
    config.validate()?;
    let segmenter = StableRegionSegmenter::new(config.segmenter.clone())?;
    let computer = TuningSimilarityComputer::new(config.tunings.clone());
    analyze_with(f0, &segmenter, &computer, config)
}

/// Analyzes one f0 track with a prepared segmenter and similarity computer.
pub fn analyze_with(
    f0: &[f64],
    segmenter: &StableRegionSegmenter,
    computer: &TuningSimilarityComputer,
    config: &AnalysisConfig,
) -> Result<TuningAnalysis> {
    let segments = segmenter.segment(f0);

    // Unvoiced frames form perfectly stable 0 Hz runs; they are not notes.
    let representatives: Vec<f64> = segments
        .iter()
        .filter_map(|segment| representative_frequency(segment.slice(f0), &config.representative))
        .filter(|&freq| freq > 0.0)
        .collect();

    let pitch_classes = group_frequencies(&representatives, config.grouping_threshold_hz)?;
    log::debug!(
        "[PIPELINE] {} segments -> {} pitch classes: {:?}",
        segments.len(),
        pitch_classes.len(),
        pitch_classes
    );

    let scale = find_scale(&pitch_classes);
    let similarity = match scale.scale() {
        Some(found) => Some(computer.compute_similarity(&found.tones)?),
        None => None,
    };
    if let Some(best) = similarity.as_ref().and_then(|s| s.best()) {
        log::info!(
            "[PIPELINE] closest tuning: {} ({:.4})",
            best.name,
            best.similarity
        );
    }

    Ok(TuningAnalysis {
        segments,
        representatives,
        pitch_classes,
        scale,
        similarity,
    })
}

/// Reduces the frames of one segment to a single frequency.
///
/// With [`Representative::StablePart`], the mean is taken over the stable
/// selection (short split-off fragments discarded); if nothing survives the
/// selection the whole segment is used.
fn representative_frequency(frames: &[f64], method: &Representative) -> Option<f64> {
    let value = match method {
        Representative::SegmentMean => mean(frames)?,
        Representative::StablePart {
            threshold,
            min_fragment_len,
        } => {
            let stable = select_stable_with_min_fragment(frames, *threshold, *min_fragment_len);
            if stable.is_empty() {
                mean(frames)?
            } else {
                mean(&stable)?
            }
        }
    };
    Some(round2(value))
}
