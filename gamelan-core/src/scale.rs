//! # Interval and Scale Detection
//!
//! Builds the interval structure of a set of pitch classes and searches it
//! for a six-tone gamelan scale (ding, dong, deng, dung, dang and the upper
//! ding).
//!
//! ## Scale heuristic
//! Two consecutive intervals under 200 cents mark a likely scale start: the
//! small steps ding-dong and dong-deng are followed by the wide leaps that
//! complete the octave.

use serde::{Deserialize, Serialize};

use crate::cents::cents_between;
use crate::error::{Error, Result};
use crate::stats::round2;

/// Tones in a complete scale, upper ding included.
pub const SCALE_TONES: usize = 6;

/// Intervals below this many cents count as a small step.
pub const SMALL_STEP_CENTS: f64 = 200.0;

/// Names of the scale degrees, low ding to high ding.
pub const TONE_NAMES: [&str; SCALE_TONES] = ["ding", "dong", "deng", "dung", "dang", "hi-ding"];

/// Computes the cents distance between each pair of consecutive pitch classes.
///
/// # Returns
/// * `Ok(intervals)` - `len - 1` distances (empty for a single pitch class)
/// * `Err(Error::EmptyInput)` - no pitch classes were given
pub fn build_intervals(pitch_classes: &[f64]) -> Result<Vec<f64>> {
    if pitch_classes.is_empty() {
        return Err(Error::EmptyInput {
            operation: "interval building",
        });
    }
    Ok(pitch_classes
        .windows(2)
        .map(|pair| cents_between(pair[0], pair[1]))
        .collect())
}

/// A complete six-tone scale with its five intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Tone frequencies in Hz, ding first.
    pub tones: [f64; SCALE_TONES],
    /// Cents between consecutive tones, rounded to 2 decimals.
    pub intervals: [f64; SCALE_TONES - 1],
}

impl Scale {
    pub fn ding(&self) -> f64 {
        self.tones[0]
    }

    pub fn hi_ding(&self) -> f64 {
        self.tones[SCALE_TONES - 1]
    }

    /// Each tone paired with its degree name.
    pub fn named_tones(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        TONE_NAMES.iter().copied().zip(self.tones.iter().copied())
    }

    /// Total span of the scale in cents.
    pub fn span_cents(&self) -> f64 {
        self.intervals.iter().sum()
    }
}

/// Outcome of searching pitch classes for a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScaleSearch {
    /// Six tones were found from the scale start.
    Complete(Scale),
    /// A scale start was found at `start` but fewer than six tones follow.
    Incomplete { start: usize, tones: Vec<f64> },
    /// No pair of consecutive small steps exists.
    NotFound,
}

impl ScaleSearch {
    pub fn scale(&self) -> Option<&Scale> {
        match self {
            ScaleSearch::Complete(scale) => Some(scale),
            _ => None,
        }
    }

    /// Converts the search outcome into a result, failing when no complete
    /// scale was found.
    pub fn into_scale(self) -> Result<Scale> {
        match self {
            ScaleSearch::Complete(scale) => Ok(scale),
            ScaleSearch::Incomplete { tones, .. } => Err(Error::IncompleteScale { found: tones.len() }),
            ScaleSearch::NotFound => Err(Error::NoScaleFound),
        }
    }
}

/// Searches ascending pitch classes for the first plausible six-tone scale.
///
/// The first index `i` whose distance and the following distance are both
/// below [`SMALL_STEP_CENTS`] is taken as ding; the scale is
/// `pitch_classes[i..i + 6]` with intervals `distances[i..i + 5]`.
pub fn find_scale(pitch_classes: &[f64]) -> ScaleSearch {
    let distances: Vec<f64> = pitch_classes
        .windows(2)
        .map(|pair| round2(cents_between(pair[0], pair[1])))
        .collect();

    let Some(start) = distances
        .windows(2)
        .position(|pair| pair[0] < SMALL_STEP_CENTS && pair[1] < SMALL_STEP_CENTS)
    else {
        log::debug!("[SCALE] no scale start among {} pitch classes", pitch_classes.len());
        return ScaleSearch::NotFound;
    };

    let end = (start + SCALE_TONES).min(pitch_classes.len());
    let candidate = &pitch_classes[start..end];
    let (Ok(tones), Ok(intervals)) = (
        <[f64; SCALE_TONES]>::try_from(candidate),
        <[f64; SCALE_TONES - 1]>::try_from(&distances[start..end - 1]),
    ) else {
        log::warn!(
            "[SCALE] could not find a complete scale, only found {} tones",
            candidate.len()
        );
        return ScaleSearch::Incomplete {
            start,
            tones: candidate.to_vec(),
        };
    };

    let scale = Scale { tones, intervals };
    for (name, freq) in scale.named_tones() {
        log::info!("[SCALE] {name}: {freq:.2} Hz");
    }
    log::info!("[SCALE] distances: {:?}", scale.intervals);
    ScaleSearch::Complete(scale)
}
