#![warn(missing_docs)]
//! Stochastic policies for Tarn, independent of any deep learning backend.
//!
//! * [`OrnsteinUhlenbeckPolicy`] adds temporally correlated noise to a mean approximator.
//!   Its noise is threaded by the caller as the policy state.
//! * [`ClippedGaussianPolicy`] samples correlated Gaussian actions around a mean
//!   approximator and clips them to the action bounds. It supports actions made of
//!   discrete probabilities followed by continuous components.
//!
//! Both policies only support sampling. [`Policy::density`] fails with
//! [`TarnError::NotImplemented`](tarn_core::TarnError::NotImplemented).
mod base;
mod gaussian;
pub mod linalg;
mod ou;
pub use base::{ParametricPolicy, Policy};
pub use gaussian::{
    ActionComposition, ClippedGaussianMode, ClippedGaussianPolicy, ClippedGaussianPolicyConfig,
    StateNormalization,
};
pub use ou::{OrnsteinUhlenbeckPolicy, OrnsteinUhlenbeckPolicyConfig};
