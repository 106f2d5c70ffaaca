//! Returns and scores of episodes.
use super::Transition;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Computes the discounted return of every complete episode in the dataset.
///
/// The discount exponent restarts from zero at the beginning of each episode.
/// Transitions after the last `last == true` flag do not contribute.
/// `gamma` is expected to be in `(0, 1]`, which is not checked.
pub fn compute_j(dataset: &[Transition], gamma: f32) -> Vec<f32> {
    let mut js = Vec::new();
    let mut j = 0.0;
    let mut discount = 1.0;

    for t in dataset.iter() {
        j += discount * t.reward;
        discount *= gamma;
        if t.last {
            js.push(j);
            j = 0.0;
            discount = 1.0;
        }
    }

    js
}

/// Statistics of undiscounted episode returns.
///
/// The default value, all zeros, is also what [`compute_scores`] returns for a dataset
/// without complete episodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Scores {
    /// Minimum return over episodes.
    pub min: f32,

    /// Maximum return over episodes.
    pub max: f32,

    /// Mean return over episodes.
    pub mean: f32,

    /// Number of complete episodes.
    pub n_episodes: usize,
}

impl fmt::Display for Scores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min = {}, max = {}, mean = {}, episodes = {}",
            self.min, self.max, self.mean, self.n_episodes
        )
    }
}

/// Computes the minimum, maximum and mean of the undiscounted episode returns.
///
/// If no episode is complete, [`Scores::default()`] is returned rather than NaN.
pub fn compute_scores(dataset: &[Transition]) -> Scores {
    let scores = compute_j(dataset, 1.0);
    if scores.is_empty() {
        return Scores::default();
    }

    let n_episodes = scores.len();
    let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mean = scores.iter().sum::<f32>() / n_episodes as f32;
    let scores = Scores {
        min,
        max,
        mean,
        n_episodes,
    };
    debug!("Scores: {}", scores);

    scores
}
