//! # Recursive Stability Selection
//!
//! Keeps the steady parts of a single segment. The segment is bisected until
//! each part's standard deviation drops below the threshold, and the stable
//! parts are concatenated in their original order.
//!
//! ## Variants
//! - [`select_stable`] bisects all the way down; a single sample has zero
//!   deviation, so with a positive threshold every sample ends up in some
//!   stable part
//! - [`select_stable_with_min_fragment`] discards fragments produced by a
//!   split that are shorter than a minimum length, which drops the outliers
//!   that only become "stable" once isolated

use crate::stats::std_dev;

/// Default std deviation below which a part counts as stable.
pub const DEFAULT_STABLE_THRESHOLD: f64 = 0.1;

/// Default minimum fragment length for [`select_stable_with_min_fragment`].
pub const DEFAULT_MIN_FRAGMENT_LEN: usize = 2;

/// Selects the stable samples of `segment`, preserving their order.
///
/// If the whole segment is stable it is returned unchanged. Otherwise it is
/// split at `len / 2` and both halves are processed independently. A single
/// sample that is still not stable (only possible with a non-positive
/// threshold) cannot be split further and is dropped.
///
/// # Arguments
/// * `segment` - f0 estimates of one segment
/// * `threshold` - Std deviation a part must stay under to be kept
pub fn select_stable(segment: &[f64], threshold: f64) -> Vec<f64> {
    let mut selected = Vec::with_capacity(segment.len());
    collect_stable(segment, threshold, &mut selected);
    selected
}

fn collect_stable(part: &[f64], threshold: f64, out: &mut Vec<f64>) {
    let Some(sd) = std_dev(part) else {
        return;
    };
    if sd < threshold {
        out.extend_from_slice(part);
    } else if part.len() > 1 {
        let mid = part.len() / 2;
        collect_stable(&part[..mid], threshold, out);
        collect_stable(&part[mid..], threshold, out);
    }
}

/// Like [`select_stable`], but fragments produced by splitting must hold at
/// least `min_len` samples to be kept.
///
/// A segment that is stable as a whole is still returned unchanged, whatever
/// its length.
pub fn select_stable_with_min_fragment(segment: &[f64], threshold: f64, min_len: usize) -> Vec<f64> {
    match std_dev(segment) {
        None => Vec::new(),
        Some(sd) if sd < threshold => segment.to_vec(),
        Some(_) => {
            let mut selected = Vec::with_capacity(segment.len());
            split_and_collect(segment, threshold, min_len.max(1), &mut selected);
            selected
        }
    }
}

fn split_and_collect(part: &[f64], threshold: f64, min_len: usize, out: &mut Vec<f64>) {
    if part.len() < 2 {
        return;
    }
    let mid = part.len() / 2;
    for half in [&part[..mid], &part[mid..]] {
        if half.len() < min_len {
            continue;
        }
        match std_dev(half) {
            Some(sd) if sd < threshold => out.extend_from_slice(half),
            Some(_) => split_and_collect(half, threshold, min_len, out),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_is_kept() {
        assert_eq!(select_stable(&[440.0], 0.1), vec![440.0]);
        assert_eq!(select_stable(&[440.0], 1e-9), vec![440.0]);
        assert_eq!(select_stable_with_min_fragment(&[440.0], 0.1, 2), vec![440.0]);
    }

    #[test]
    fn empty_segment_stays_empty() {
        assert!(select_stable(&[], 0.1).is_empty());
        assert!(select_stable_with_min_fragment(&[], 0.1, 2).is_empty());
    }

    #[test]
    fn stable_segment_is_unchanged() {
        let segment = [220.0, 220.01, 219.99, 220.0];
        assert_eq!(select_stable(&segment, 0.1), segment.to_vec());
        // Selecting again is a no-op.
        let once = select_stable(&segment, 0.1);
        assert_eq!(select_stable(&once, 0.1), once);
    }

    #[test]
    fn full_bisection_keeps_isolated_samples() {
        // [230, 260] splits into two single samples, each trivially stable.
        let segment = [220.0, 220.0, 230.0, 260.0];
        assert_eq!(select_stable(&segment, 0.1), segment.to_vec());

        let segment = [100.0, 100.0, 100.0, 200.0, 200.0];
        assert_eq!(select_stable(&segment, 0.5), segment.to_vec());
    }

    #[test]
    fn min_fragment_drops_isolated_samples() {
        let segment = [220.0, 220.0, 230.0, 260.0];
        assert_eq!(
            select_stable_with_min_fragment(&segment, 0.1, 2),
            vec![220.0, 220.0]
        );

        // The split lands inside the run of 100s: [100, 100] | [100, 200, 200],
        // and the lone 100 of the right half is lost with the minimum length.
        let segment = [100.0, 100.0, 100.0, 200.0, 200.0];
        assert_eq!(
            select_stable_with_min_fragment(&segment, 0.5, 2),
            vec![100.0, 100.0, 200.0, 200.0]
        );
        // A minimum of 1 is the full bisection.
        assert_eq!(
            select_stable_with_min_fragment(&segment, 0.5, 1),
            select_stable(&segment, 0.5)
        );
    }

    #[test]
    fn keeps_stable_parts_from_both_halves() {
        let segment = [
            100.0, 100.0, 100.0, 100.0, 180.0, 120.0, 200.0, 200.0, 200.0, 200.0, 150.0, 90.0,
        ];
        assert_eq!(
            select_stable_with_min_fragment(&segment, 0.5, 2),
            vec![100.0, 100.0, 100.0, 200.0, 200.0, 200.0]
        );
    }

    #[test]
    fn non_positive_threshold_keeps_nothing() {
        assert!(select_stable(&[1.0, 1.0, 2.0], 0.0).is_empty());
        assert!(select_stable(&[1.0], 0.0).is_empty());
        assert!(select_stable_with_min_fragment(&[1.0, 1.0, 2.0], 0.0, 2).is_empty());
    }

    #[test]
    fn output_is_subsequence() {
        let segment = [100.0, 100.1, 150.0, 100.0, 100.05, 100.02, 180.0];
        let selected = select_stable_with_min_fragment(&segment, 0.5, 2);
        let mut it = segment.iter();
        assert!(selected.iter().all(|s| it.any(|v| v == s)));
    }
}
