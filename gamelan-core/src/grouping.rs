//! # Pitch Class Grouping
//!
//! Collapses near-duplicate frequency estimates into single pitch classes.

use crate::error::{Error, Result};

/// Default max gap in Hz between neighbouring frequencies of one group.
pub const DEFAULT_GROUPING_THRESHOLD_HZ: f64 = 10.0;

/// Groups sorted frequencies and returns the mean of each group, ascending.
///
/// Grouping is chain-linked: a value joins the current group when it is
/// within `threshold` of the previous value, not of the group mean, so a long
/// run of close values can span far more than `threshold` in total.
///
/// # Arguments
/// * `frequencies` - Representative frequencies in Hz, any order
/// * `threshold` - Max gap in Hz between neighbours of one group
///
/// # Returns
/// * `Ok(pitch_classes)` - One averaged frequency per group
/// * `Err(Error::EmptyInput)` - `frequencies` was empty
pub fn group_frequencies(frequencies: &[f64], threshold: f64) -> Result<Vec<f64>> {
    let mut sorted = frequencies.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let (&first, rest) = sorted.split_first().ok_or(Error::EmptyInput {
        operation: "frequency grouping",
    })?;

    let mut grouped = Vec::new();
    let mut current_sum = first;
    let mut current_len = 1usize;
    let mut previous = first;

    for &freq in rest {
        if freq - previous <= threshold {
            current_sum += freq;
            current_len += 1;
        } else {
            grouped.push(current_sum / current_len as f64);
            current_sum = freq;
            current_len = 1;
        }
        previous = freq;
    }
    grouped.push(current_sum / current_len as f64);

    Ok(grouped)
}
