//! Analytics on flat buffers of transitions.
//!
//! A dataset is an ordered slice of [`Transition`]s, where the insertion order is the
//! temporal order of interaction. Episodes are not stored explicitly: an episode is the
//! maximal contiguous run of transitions ending at a transition with `last == true`.
//! Transitions after the final `last` flag form an incomplete episode, which is ignored
//! by the return computations.
mod max_qa;
mod parse;
mod returns;
mod select;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

pub use max_qa::max_qa;
pub use parse::{parse_dataset, ParsedDataset};
pub use returns::{compute_j, compute_scores, Scores};
pub use select::{select_episodes, select_episodes_parsed, select_samples, select_samples_parsed};

/// One step of interaction with an environment.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Transition {
    /// Observed state.
    pub state: ArrayD<f32>,

    /// Action taken in `state`.
    pub action: ArrayD<f32>,

    /// Reward received after taking `action`.
    pub reward: f32,

    /// State reached after taking `action`.
    pub next_state: ArrayD<f32>,

    /// `next_state` is terminal by the environment.
    pub absorbing: bool,

    /// This is the last step of an episode, either absorbing or time-limit.
    pub last: bool,
}

impl Transition {
    /// Constructs a [`Transition`].
    pub fn new(
        state: ArrayD<f32>,
        action: ArrayD<f32>,
        reward: f32,
        next_state: ArrayD<f32>,
        absorbing: bool,
        last: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            absorbing,
            last,
        }
    }
}

/// Returns the indices of transitions with `last == true`, in temporal order.
pub fn episode_ends(dataset: &[Transition]) -> Vec<usize> {
    dataset
        .iter()
        .enumerate()
        .filter_map(|(i, t)| if t.last { Some(i) } else { None })
        .collect()
}
