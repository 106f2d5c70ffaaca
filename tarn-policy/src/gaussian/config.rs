//! Configuration of [`ClippedGaussianPolicy`](super::ClippedGaussianPolicy).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Layout of the approximator output and how it is turned into an action.
///
/// The first `discrete_action_dims` components of the approximator output are logits of
/// discrete actions, mapped to probabilities with a sigmoid. The last
/// `continuous_action_dims` components are the mean of the continuous actions.
/// With `continuous_action_dims == 0`, every component after the discrete ones is continuous.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub struct ActionComposition {
    /// If `true`, the continuous mean is squashed into `[-1, 1]` with `tanh`.
    pub squash: bool,

    /// Number of discrete action components.
    pub discrete_action_dims: usize,

    /// Number of continuous action components.
    pub continuous_action_dims: usize,
}

impl ActionComposition {
    /// Sets `squash`.
    pub fn squash(mut self, v: bool) -> Self {
        self.squash = v;
        self
    }

    /// Sets the number of discrete action components.
    pub fn discrete_action_dims(mut self, v: usize) -> Self {
        self.discrete_action_dims = v;
        self
    }

    /// Sets the number of continuous action components.
    pub fn continuous_action_dims(mut self, v: usize) -> Self {
        self.continuous_action_dims = v;
        self
    }
}

/// How [`ClippedGaussianPolicy`](super::ClippedGaussianPolicy) draws actions.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum ClippedGaussianMode {
    /// Uniform actions within the bounds, ignoring the state.
    Random,

    /// The mean action, without noise.
    Deterministic(ActionComposition),

    /// Actions sampled around the mean action.
    Stochastic(ActionComposition),
}

impl Default for ClippedGaussianMode {
    fn default() -> Self {
        Self::Stochastic(ActionComposition::default())
    }
}

/// Configuration of [`ClippedGaussianPolicy`](super::ClippedGaussianPolicy).
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Clone)]
pub struct ClippedGaussianPolicyConfig {
    /// Covariance matrix of the continuous actions, given as rows.
    pub sigma: Vec<Vec<f64>>,

    /// Lower bounds of action components.
    pub low: Vec<f32>,

    /// Upper bounds of action components.
    pub high: Vec<f32>,

    /// Mode of drawing actions.
    pub mode: ClippedGaussianMode,

    /// If `true`, states are standardized before they are given to the approximator.
    pub normalize_states: bool,
}

impl ClippedGaussianPolicyConfig {
    /// Creates a configuration in stochastic mode.
    pub fn new(sigma: Vec<Vec<f64>>, low: Vec<f32>, high: Vec<f32>) -> Self {
        Self {
            sigma,
            low,
            high,
            ..Default::default()
        }
    }

    /// Sets the mode.
    pub fn mode(mut self, v: ClippedGaussianMode) -> Self {
        self.mode = v;
        self
    }

    /// Sets `normalize_states`.
    pub fn normalize_states(mut self, v: bool) -> Self {
        self.normalize_states = v;
        self
    }

    /// Constructs [`ClippedGaussianPolicyConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ClippedGaussianPolicyConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
