#![warn(missing_docs)]
//! Core of Tarn, a reinforcement learning library.
//!
//! This crate provides
//!
//! * analytics on flat buffers of [`Transition`]s: decomposition into arrays,
//!   selection of episodes and samples, and discounted or undiscounted episode returns,
//! * the interface of function approximators consumed by policies ([`Approximator`],
//!   [`ActionValues`]) and a backend-free implementation of it ([`Mlp`]),
//! * the error type of the library ([`TarnError`]),
//! * descriptors of checkpointed fields ([`SaveAttr`], [`Persistent`]).
mod approximator;
pub mod dataset;
pub mod error;
pub mod mlp;
mod save_attr;

pub use approximator::{ActionValues, Approximator};
pub use dataset::{
    compute_j, compute_scores, episode_ends, max_qa, parse_dataset, select_episodes,
    select_episodes_parsed, select_samples, select_samples_parsed, ParsedDataset, Scores,
    Transition,
};
pub use error::TarnError;
pub use mlp::{Mlp, MlpConfig};
pub use save_attr::{Persistent, SaveAttr};
