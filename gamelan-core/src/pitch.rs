//! # Pitch Track Adapters
//!
//! The pitch estimators themselves live outside this crate. This module turns
//! their output into the frame-wise frequency track the rest of the pipeline
//! consumes.
//!
//! ## Supported sources
//! - Spectral peak trackers that report a `(pitches, magnitudes)` pair of
//!   `bins x frames` arrays
//! - Neural estimators that report per-frame time, frequency and confidence

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Picks the strongest pitch candidate of every frame.
///
/// For each frame (column) the bin with the largest magnitude is located and
/// the pitch stored at that bin becomes the frame's f0. When several bins
/// share the maximum, the lowest bin wins.
///
/// # Arguments
/// * `pitches` - Candidate frequencies, one row per bin, one column per frame
/// * `magnitudes` - Magnitudes with the same shape as `pitches`
///
/// # Returns
/// * `Ok(track)` - One frequency per frame
/// * `Err(Error::ShapeMismatch)` - The two arrays do not have the same shape
pub fn track_from_peak_magnitudes(pitches: &[Vec<f64>], magnitudes: &[Vec<f64>]) -> Result<Vec<f64>> {
    if pitches.len() != magnitudes.len() {
        return Err(Error::ShapeMismatch {
            what: "frequency bins",
            expected: pitches.len(),
            found: magnitudes.len(),
        });
    }
    let Some(first_row) = magnitudes.first() else {
        return Ok(Vec::new());
    };
    let frames = first_row.len();
    for (pitch_row, mag_row) in pitches.iter().zip(magnitudes) {
        if pitch_row.len() != frames || mag_row.len() != frames {
            return Err(Error::ShapeMismatch {
                what: "frames per bin",
                expected: frames,
                found: pitch_row.len().max(mag_row.len()),
            });
        }
    }

    let track = (0..frames)
        .map(|frame| {
            let mut peak_bin = 0;
            let mut peak_mag = f64::NEG_INFINITY;
            for (bin, row) in magnitudes.iter().enumerate() {
                if row[frame] > peak_mag {
                    peak_mag = row[frame];
                    peak_bin = bin;
                }
            }
            pitches[peak_bin][frame]
        })
        .collect();
    Ok(track)
}

/// Output of a neural pitch estimator, one entry per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeuralPitchTrack {
    /// Frame times in seconds
    pub time: Vec<f64>,
    /// Estimated f0 in Hz
    pub frequency: Vec<f64>,
    /// Voicing confidence (0.0 to 1.0)
    pub confidence: Vec<f64>,
}

impl NeuralPitchTrack {
    /// Builds a track, checking that all columns have the same length.
    pub fn new(time: Vec<f64>, frequency: Vec<f64>, confidence: Vec<f64>) -> Result<Self> {
        for (what, len) in [("time column", time.len()), ("confidence column", confidence.len())] {
            if len != frequency.len() {
                return Err(Error::ShapeMismatch {
                    what,
                    expected: frequency.len(),
                    found: len,
                });
            }
        }
        Ok(Self {
            time,
            frequency,
            confidence,
        })
    }

    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// The raw frequency track.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequency
    }

    /// The frequency track with frames below `min_confidence` set to 0 Hz
    /// (unvoiced).
    pub fn voiced_frequencies(&self, min_confidence: f64) -> Vec<f64> {
        self.frequency
            .iter()
            .zip(&self.confidence)
            .map(|(&freq, &conf)| if conf >= min_confidence { freq } else { 0.0 })
            .collect()
    }

    /// Mean spacing between frames in seconds, if there are at least two.
    pub fn frame_period(&self) -> Option<f64> {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) if self.time.len() > 1 => {
                Some((last - first) / (self.time.len() - 1) as f64)
            }
            _ => None,
        }
    }
}
