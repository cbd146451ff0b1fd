//! # Stable Region Segmentation
//!
//! Finds the sustained notes in a frame-wise f0 track. A frame counts as
//! stable when the standard deviation (in cents) of the trailing
//! `stable_window` frames is at or below `std_threshold`; contiguous stable
//! frames form a segment, and segments shorter than the minimum note
//! duration are discarded.
//!
//! ## Boundary behaviour
//! Runs are delimited by rising and falling edges of the stability mask, so a
//! run that is still open at the end of the track (or already open at frame
//! 0) has no matching edge and is dropped. Set
//! [`SegmenterConfig::include_partial_runs`] to keep such runs.

use serde::{Deserialize, Serialize};

use crate::cents::track_to_cents;
use crate::error::{Error, Result};
use crate::stats::{mean, round2, std_dev};

/// Std deviation assigned to frames that do not yet have a full window.
const UNSTABLE_SENTINEL: f64 = 1e10;

/// Parameters of the sliding-window segmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Max std deviation (cents) of a stable window.
    pub std_threshold: f64,
    /// Minimum segment length in seconds.
    pub min_note_duration: f64,
    /// Number of frames used for each std deviation.
    pub stable_window: usize,
    /// Sample rate of the analysed audio in Hz.
    pub sample_rate: f64,
    /// Hop size between f0 frames, in samples.
    pub hop_size: usize,
    /// Close runs left open at either end of the track instead of dropping them.
    pub include_partial_runs: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            std_threshold: 10.0,
            min_note_duration: 0.1,
            stable_window: 3,
            sample_rate: 22050.0,
            hop_size: 512,
            include_partial_runs: false,
        }
    }
}

impl SegmenterConfig {
    /// Checks that the window and frame spacing are usable.
    pub fn validate(&self) -> Result<()> {
        if self.stable_window == 0 {
            return Err(Error::InvalidParameter(
                "stable_window must be at least 1".into(),
            ));
        }
        if self.hop_size == 0 {
            return Err(Error::InvalidParameter("hop_size must be at least 1".into()));
        }
        if !(self.sample_rate > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !(self.min_note_duration >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "min_note_duration must be non-negative, got {}",
                self.min_note_duration
            )));
        }
        Ok(())
    }

    /// Minimum segment length in frames: `ceil(min_note_duration * fs / hop)`.
    pub fn min_note_samples(&self) -> usize {
        (self.min_note_duration * self.sample_rate / self.hop_size as f64).ceil() as usize
    }
}

/// A stable region `[onset, offset)` of an f0 track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StableSegment {
    /// First frame of the region.
    pub onset: usize,
    /// Exclusive end frame of the region.
    pub offset: usize,
    /// Mean frequency inside the region in Hz, rounded to 2 decimals.
    pub mean_hz: f64,
    /// Mean cents inside the region, rounded to 2 decimals.
    pub mean_cents: f64,
}

impl StableSegment {
    /// Number of frames covered; 0 for a reversed segment.
    pub fn len(&self) -> usize {
        self.offset.saturating_sub(self.onset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The frames of `track` covered by this segment.
    pub fn slice<'a>(&self, track: &'a [f64]) -> &'a [f64] {
        &track[self.onset..self.offset.max(self.onset)]
    }

    /// Onset time in seconds for the given frame spacing.
    pub fn onset_seconds(&self, sample_rate: f64, hop_size: usize) -> f64 {
        self.onset as f64 * hop_size as f64 / sample_rate
    }

    /// Duration in seconds for the given frame spacing.
    pub fn duration_seconds(&self, sample_rate: f64, hop_size: usize) -> f64 {
        self.len() as f64 * hop_size as f64 / sample_rate
    }
}

/// Segments an f0 track into stable note regions.
#[derive(Debug, Clone, Default)]
pub struct StableRegionSegmenter {
    config: SegmenterConfig,
}

impl StableRegionSegmenter {
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Returns the stable segments of `f0`, ascending and non-overlapping.
    ///
    /// # Arguments
    /// * `f0` - Frame-wise fundamental frequency in Hz (0 for unvoiced frames)
    pub fn segment(&self, f0: &[f64]) -> Vec<StableSegment> {
        let cents = track_to_cents(f0);
        let stable = self.stability_mask(&cents);
        let runs = self.pair_edges(&stable);

        // Zero-length runs cover no frames and have no representative value.
        let min_samples = self.config.min_note_samples().max(1);
        let segments: Vec<StableSegment> = runs
            .into_iter()
            .filter(|&(onset, offset)| offset - onset >= min_samples)
            .map(|(onset, offset)| StableSegment {
                onset,
                offset,
                mean_hz: round2(mean(&f0[onset..offset]).unwrap_or(0.0)),
                mean_cents: round2(mean(&cents[onset..offset]).unwrap_or(0.0)),
            })
            .collect();

        log::debug!(
            "[SEGMENT] {} frames -> {} stable segments (min {} frames)",
            f0.len(),
            segments.len(),
            min_samples
        );
        segments
    }

    /// Marks every frame whose trailing window std is within the threshold.
    fn stability_mask(&self, cents: &[f64]) -> Vec<bool> {
        let window = self.config.stable_window;
        (0..cents.len())
            .map(|i| {
                let sd = if i + 1 >= window {
                    std_dev(&cents[i + 1 - window..=i]).unwrap_or(UNSTABLE_SENTINEL)
                } else {
                    UNSTABLE_SENTINEL
                };
                sd <= self.config.std_threshold
            })
            .collect()
    }

    /// Turns the stability mask into `(onset, offset)` pairs.
    ///
    /// An onset is the first frame after a rising edge, an offset the last
    /// stable frame before a falling edge.
    fn pair_edges(&self, stable: &[bool]) -> Vec<(usize, usize)> {
        let mut onsets: Vec<usize> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        if self.config.include_partial_runs && stable.first() == Some(&true) {
            onsets.push(0);
        }
        for (i, pair) in stable.windows(2).enumerate() {
            match (pair[0], pair[1]) {
                (false, true) => onsets.push(i + 1),
                (true, false) => offsets.push(i),
                _ => {}
            }
        }

        let Some(&first_onset) = onsets.first() else {
            return Vec::new();
        };
        offsets.retain(|&off| off >= first_onset);

        if self.config.include_partial_runs
            && onsets.len() > offsets.len()
            && stable.last() == Some(&true)
        {
            offsets.push(stable.len());
        } else if onsets.len() > offsets.len() {
            log::debug!(
                "[SEGMENT] dropping stable run left open at frame {}",
                onsets[onsets.len() - 1]
            );
        }

        onsets.into_iter().zip(offsets).collect()
    }
}

/// A fixed-size window whose values are stable, with its rounded mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StableWindow {
    pub onset: usize,
    pub offset: usize,
    pub mean: f64,
}

/// Slides a `window_size` window over `values` and reports every window whose
/// std deviation is strictly below `threshold`.
///
/// Windows overlap: consecutive stable starts produce overlapping regions.
pub fn find_stable_windows(values: &[f64], window_size: usize, threshold: f64) -> Vec<StableWindow> {
    if window_size == 0 || values.len() < window_size {
        return Vec::new();
    }
    values
        .windows(window_size)
        .enumerate()
        .filter_map(|(i, window)| {
            let sd = std_dev(window)?;
            if sd < threshold {
                Some(StableWindow {
                    onset: i,
                    offset: i + window_size,
                    mean: round2(mean(window)?),
                })
            } else {
                None
            }
        })
        .collect()
}
