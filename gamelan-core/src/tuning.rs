//! # Gamelan Tuning Similarity Module
//!
//! This module compares the interval structure of a measured scale against
//! reference gamelan tunings. Each reference is a vector of the cents
//! intervals between consecutive tones starting from ding.
//!
//! ## Features
//! - Static table of the begbeg, sedang and tirus tunings
//! - Candidate interval vectors from raw frequencies
//! - Cosine similarity scoring against every reference tuning
//!
//! ## Reference tunings (cents)
//! | tuning | ding-dong | dong-deng | deng-dung | dung-dang | dang-ding |
//! |--------|-----------|-----------|-----------|-----------|-----------|
//! | begbeg | 120       | 114       | 432       | 81        | 453       |
//! | sedang | 136       | 155       | 379       | 134       | 396       |
//! | tirus  | 197       | 180       | 347       | 104       | 372       |

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::cents::track_to_cents;
use crate::error::{Error, Result};

/// A named reference tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTuning {
    /// Tuning name (e.g. "begbeg")
    pub name: String,
    /// Cents between consecutive tones, starting from ding
    pub intervals: Vec<f64>,
}

impl ReferenceTuning {
    pub fn new(name: impl Into<String>, intervals: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }
}

/// The three reference gamelan tunings, built once on first use.
pub static GAMELAN_TUNINGS: Lazy<Vec<ReferenceTuning>> = Lazy::new(|| {
    vec![
        ReferenceTuning::new("begbeg", vec![120.0, 114.0, 432.0, 81.0, 453.0]),
        ReferenceTuning::new("sedang", vec![136.0, 155.0, 379.0, 134.0, 396.0]),
        ReferenceTuning::new("tirus", vec![197.0, 180.0, 347.0, 104.0, 372.0]),
    ]
});

/// Similarity of a candidate against one reference tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningScore {
    pub name: String,
    /// Cosine similarity in [-1, 1]
    pub similarity: f64,
}

/// Scores of one candidate against every reference, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// The candidate interval vector that was scored.
    pub intervals: Vec<f64>,
    pub scores: Vec<TuningScore>,
}

impl SimilarityResult {
    /// Score for the tuning called `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.similarity)
    }

    /// The most similar reference tuning.
    pub fn best(&self) -> Option<&TuningScore> {
        self.scores
            .iter()
            .max_by(|a, b| a.similarity.total_cmp(&b.similarity))
    }
}

/// Scores frequency sequences against a fixed table of reference tunings.
#[derive(Debug, Clone)]
pub struct TuningSimilarityComputer {
    tunings: Vec<ReferenceTuning>,
}

impl Default for TuningSimilarityComputer {
    fn default() -> Self {
        Self::new(GAMELAN_TUNINGS.clone())
    }
}

impl TuningSimilarityComputer {
    pub fn new(tunings: Vec<ReferenceTuning>) -> Self {
        Self { tunings }
    }

    pub fn tunings(&self) -> &[ReferenceTuning] {
        &self.tunings
    }

    /// Absolute cents differences between consecutive frequencies.
    ///
    /// # Returns
    /// * `Ok(intervals)` - `len - 1` intervals
    /// * `Err(Error::EmptyInput)` - no frequencies were given
    pub fn candidate_intervals(fqs: &[f64]) -> Result<Vec<f64>> {
        if fqs.is_empty() {
            return Err(Error::EmptyInput {
                operation: "tuning similarity",
            });
        }
        let cents = track_to_cents(fqs);
        Ok(cents.windows(2).map(|pair| (pair[1] - pair[0]).abs()).collect())
    }

    /// Computes the cosine similarity of `fqs`' intervals to every reference.
    ///
    /// # Arguments
    /// * `fqs` - Scale tone frequencies in Hz; one more than the reference
    ///   interval count (six for the gamelan table)
    ///
    /// # Returns
    /// * `Ok(result)` - One score per reference tuning
    /// * `Err(Error::EmptyInput)` - `fqs` was empty
    /// * `Err(Error::LengthMismatch)` - Wrong number of frequencies
    pub fn compute_similarity(&self, fqs: &[f64]) -> Result<SimilarityResult> {
        log::debug!("[TUNING] estimated freqs (Hz): {fqs:?}");
        let intervals = Self::candidate_intervals(fqs)?;
        log::debug!("[TUNING] computed intervals (cents): {intervals:?}");
        self.compute_similarity_for_intervals(&intervals)
    }

    /// Scores an interval vector that has already been built.
    pub fn compute_similarity_for_intervals(&self, intervals: &[f64]) -> Result<SimilarityResult> {
        let scores = self
            .tunings
            .iter()
            .map(|tuning| {
                if tuning.intervals.len() != intervals.len() {
                    return Err(Error::LengthMismatch {
                        expected: tuning.intervals.len(),
                        found: intervals.len(),
                    });
                }
                Ok(TuningScore {
                    name: tuning.name.clone(),
                    similarity: cosine_similarity(intervals, &tuning.intervals),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SimilarityResult {
            intervals: intervals.to_vec(),
            scores,
        })
    }
}

/// Cosine of the angle between two equal-length vectors.
///
/// A zero vector has no direction and scores 0.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tones_from_steps(base: f64, steps: &[f64]) -> Vec<f64> {
        let mut tones = vec![base];
        for step in steps {
            let last = tones[tones.len() - 1];
            tones.push(last * 2f64.powf(step / 1200.0));
        }
        tones
    }

    #[test]
    fn begbeg_shaped_scale_matches_begbeg() {
        let computer = TuningSimilarityComputer::default();
        let fqs = tones_from_steps(220.0, &[120.0, 114.0, 432.0, 81.0, 453.0]);
        let result = computer.compute_similarity(&fqs).unwrap();

        let begbeg = result.get("begbeg").unwrap();
        assert!((begbeg - 1.0).abs() < 1e-9);
        assert!(result.get("sedang").unwrap() <= 1.0);
        assert!(result.get("tirus").unwrap() < begbeg);
        assert_eq!(result.best().unwrap().name, "begbeg");
    }

    #[test]
    fn scores_are_in_table_order() {
        let computer = TuningSimilarityComputer::default();
        let fqs = tones_from_steps(300.0, &[197.0, 180.0, 347.0, 104.0, 372.0]);
        let result = computer.compute_similarity(&fqs).unwrap();
        let names: Vec<&str> = result.scores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["begbeg", "sedang", "tirus"]);
        assert_eq!(result.best().unwrap().name, "tirus");
    }

    #[test]
    fn descending_frequencies_use_absolute_intervals() {
        let computer = TuningSimilarityComputer::default();
        let mut fqs = tones_from_steps(220.0, &[136.0, 155.0, 379.0, 134.0, 396.0]);
        fqs.reverse();
        let result = computer.compute_similarity(&fqs).unwrap();
        assert!(result.intervals.iter().all(|&i| i > 0.0));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let computer = TuningSimilarityComputer::default();
        assert_eq!(
            computer.compute_similarity(&[220.0, 240.0, 260.0]),
            Err(Error::LengthMismatch {
                expected: 5,
                found: 2
            })
        );
        let seven = tones_from_steps(220.0, &[100.0; 6]);
        assert!(matches!(
            computer.compute_similarity(&seven),
            Err(Error::LengthMismatch { found: 6, .. })
        ));
    }

    #[test]
    fn empty_frequencies_are_rejected() {
        let computer = TuningSimilarityComputer::default();
        assert!(matches!(
            computer.compute_similarity(&[]),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn zero_vector_scores_zero() {
        let computer = TuningSimilarityComputer::default();
        let result = computer.compute_similarity(&[220.0; 6]).unwrap();
        assert!(result.scores.iter().all(|s| s.similarity == 0.0));
    }

    #[test]
    fn custom_tuning_table() {
        let computer = TuningSimilarityComputer::new(vec![ReferenceTuning::new(
            "octaves",
            vec![1200.0, 1200.0],
        )]);
        let result = computer.compute_similarity(&[55.0, 110.0, 220.0]).unwrap();
        assert!((result.get("octaves").unwrap() - 1.0).abs() < 1e-12);
    }
}
