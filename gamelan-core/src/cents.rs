//! # Cents Conversion
//!
//! Conversions between linear frequency and the logarithmic cents scale.
//!
//! - 100 cents = 1 semitone
//! - 1200 cents = 1 octave
//!
//! Absolute cents values are measured against a fixed 55 Hz reference (A1).

/// Reference frequency in Hz for absolute cents values.
pub const REFERENCE_HZ: f64 = 55.0;

/// Converts a frequency in Hz to cents above [`REFERENCE_HZ`].
///
/// Machine epsilon is added before taking the logarithm so that an unvoiced
/// frame (0 Hz) maps to a very low but finite value instead of `-inf`.
///
/// # Arguments
/// * `hz` - Frequency in Hz, expected to be non-negative
///
/// # Returns
/// * Cents relative to 55 Hz
pub fn hz_to_cents(hz: f64) -> f64 {
    1200.0 * ((hz + f64::EPSILON) / REFERENCE_HZ).log2()
}

/// Converts a whole frequency track to cents, frame by frame.
pub fn track_to_cents(track: &[f64]) -> Vec<f64> {
    track.iter().map(|&hz| hz_to_cents(hz)).collect()
}

/// Distance in cents from `tone_a` up to `tone_b`.
///
/// A zero `tone_a` yields 0 rather than an infinite distance. The result is
/// only meaningful for `tone_b > tone_a > 0`, i.e. an ascending scale.
pub fn cents_between(tone_a: f64, tone_b: f64) -> f64 {
    if tone_a == 0.0 {
        return 0.0;
    }
    1200.0 * (tone_b / tone_a).log2()
}
