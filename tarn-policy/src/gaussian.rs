//! Clipped Gaussian policy.
//!
//! The policy samples actions from a Gaussian distribution whose mean is computed from the
//! state and whose covariance is fixed, then clips them to the action bounds, as used in
//! "Addressing Function Approximation Error in Actor-Critic Methods", Fujimoto et al., 2018.
//! Clipping makes the policy non-differentiable. It is not a truncated Gaussian.
mod config;
mod normalization;
use crate::{linalg, ParametricPolicy, Policy};
use anyhow::Result;
pub use config::{ActionComposition, ClippedGaussianMode, ClippedGaussianPolicyConfig};
use log::info;
use ndarray::{concatenate, s, Array1, Array2, ArrayD, Axis, Ix1, Zip};
pub use normalization::StateNormalization;
use rand::Rng;
use rand_distr::StandardNormal;
use tarn_core::{Approximator, Persistent, SaveAttr, TarnError};

/// Clipped Gaussian policy on a mixed discrete/continuous action space.
///
/// An action is the concatenation `[discrete_probs, continuous]`, clipped component-wise
/// to `[low, high]`. `discrete_probs` are sigmoid-activated logits taken from the head of the
/// approximator output. `continuous` is the mean taken from the tail of the output,
/// optionally squashed with `tanh`, plus correlated Gaussian noise in the stochastic mode.
///
/// The approximator must produce a one-dimensional output.
pub struct ClippedGaussianPolicy<A: Approximator> {
    approximator: A,

    // Lower-triangular factor of the covariance matrix
    chol_sigma: Array2<f32>,

    low: Array1<f32>,
    high: Array1<f32>,
    mode: ClippedGaussianMode,
    normalize_states: bool,
    normalization: Option<StateNormalization>,
}

impl<A: Approximator> ClippedGaussianPolicy<A> {
    /// Creates the policy.
    ///
    /// `sigma` is the covariance matrix of the continuous actions. It is factorized here
    /// and [`TarnError::InvalidCovariance`] is returned if it is not symmetric
    /// positive-definite.
    pub fn new(
        approximator: A,
        sigma: &Array2<f64>,
        low: Array1<f32>,
        high: Array1<f32>,
        mode: ClippedGaussianMode,
        normalize_states: bool,
    ) -> Result<Self> {
        let chol_sigma = linalg::cholesky(sigma)?.mapv(|v| v as f32);

        if low.len() != high.len() {
            return Err(TarnError::InvalidArgument(format!(
                "low has {} components, high has {}",
                low.len(),
                high.len()
            ))
            .into());
        }
        if let ClippedGaussianMode::Deterministic(c) | ClippedGaussianMode::Stochastic(c) = &mode {
            if c.continuous_action_dims > 0 {
                if matches!(mode, ClippedGaussianMode::Stochastic(_))
                    && c.continuous_action_dims != chol_sigma.nrows()
                {
                    return Err(TarnError::InvalidArgument(format!(
                        "{} continuous actions, but the covariance matrix is {} x {}",
                        c.continuous_action_dims,
                        chol_sigma.nrows(),
                        chol_sigma.nrows()
                    ))
                    .into());
                }
                if c.discrete_action_dims + c.continuous_action_dims != low.len() {
                    return Err(TarnError::InvalidArgument(format!(
                        "{} discrete and {} continuous actions, but bounds have {} components",
                        c.discrete_action_dims,
                        c.continuous_action_dims,
                        low.len()
                    ))
                    .into());
                }
            }
        }
        info!(
            "Build clipped Gaussian policy: {:?}, {} action components, normalize_states = {}",
            mode,
            low.len(),
            normalize_states
        );

        Ok(Self {
            approximator,
            chol_sigma,
            low,
            high,
            mode,
            normalize_states,
            normalization: None,
        })
    }

    /// Builds the policy from a configuration.
    pub fn build(approximator: A, config: &ClippedGaussianPolicyConfig) -> Result<Self> {
        let n = config.sigma.len();
        if config.sigma.iter().any(|row| row.len() != n) {
            return Err(TarnError::InvalidCovariance(format!(
                "{} rows of lengths {:?}",
                n,
                config.sigma.iter().map(|row| row.len()).collect::<Vec<_>>()
            ))
            .into());
        }
        let sigma = Array2::from_shape_vec((n, n), config.sigma.concat())?;

        Self::new(
            approximator,
            &sigma,
            Array1::from(config.low.clone()),
            Array1::from(config.high.clone()),
            config.mode,
            config.normalize_states,
        )
    }

    /// Sets the statistics used to standardize states.
    ///
    /// Required before drawing actions from states if `normalize_states` is enabled.
    pub fn with_normalization(mut self, mean: ArrayD<f32>, std: ArrayD<f32>) -> Result<Self> {
        self.normalization = Some(StateNormalization::new(mean, std)?);
        Ok(self)
    }

    /// Returns the statistics used to standardize states, if set.
    pub fn normalization(&self) -> Option<&StateNormalization> {
        self.normalization.as_ref()
    }

    /// Returns a reference to the mean approximator.
    pub fn approximator(&self) -> &A {
        &self.approximator
    }

    /// Returns the mode of the policy.
    pub fn mode(&self) -> &ClippedGaussianMode {
        &self.mode
    }

    /// Returns the lower-triangular Cholesky factor of the covariance matrix.
    pub fn chol_sigma(&self) -> &Array2<f32> {
        &self.chol_sigma
    }

    fn composition(&self) -> ActionComposition {
        match self.mode {
            ClippedGaussianMode::Random => ActionComposition::default(),
            ClippedGaussianMode::Deterministic(c) | ClippedGaussianMode::Stochastic(c) => c,
        }
    }

    /// Draws an action uniformly within `[low, high]`.
    pub fn draw_random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f32> {
        Array1::from_shape_fn(self.low.len(), |i| {
            rng.gen::<f32>() * (self.high[i] - self.low[i]) + self.low[i]
        })
    }

    /// Returns the mean action without noise.
    ///
    /// In the random mode, the approximator output is taken as the continuous mean as is.
    pub fn draw_deterministic_action(&self, state: &ArrayD<f32>) -> Result<Array1<f32>> {
        let (discrete, continuous) = self.mean_action(state, &self.composition())?;
        self.compose(discrete, continuous)
    }

    /// Samples an action around the mean action.
    fn draw_stochastic_action<R: Rng + ?Sized>(
        &self,
        state: &ArrayD<f32>,
        composition: &ActionComposition,
        rng: &mut R,
    ) -> Result<Array1<f32>> {
        let (discrete, mean) = self.mean_action(state, composition)?;
        if mean.len() != self.chol_sigma.nrows() {
            return Err(TarnError::ShapeMismatch {
                expected: vec![self.chol_sigma.nrows()],
                got: vec![mean.len()],
            }
            .into());
        }

        let z = Array1::from_shape_simple_fn(mean.len(), || rng.sample::<f32, _>(StandardNormal));
        let continuous = mean + self.chol_sigma.dot(&z);
        self.compose(discrete, continuous)
    }

    /// Normalizes the state, queries the approximator and splits the output into
    /// discrete probabilities and the (squashed) continuous mean.
    fn mean_action(
        &self,
        state: &ArrayD<f32>,
        composition: &ActionComposition,
    ) -> Result<(Array1<f32>, Array1<f32>)> {
        let mu = if self.normalize_states {
            let normalization = self
                .normalization
                .as_ref()
                .ok_or(TarnError::NormalizationNotConfigured)?;
            self.approximator.predict(&normalization.apply(state)?)?
        } else {
            self.approximator.predict(state)?
        };
        let shape = mu.shape().to_vec();
        let mu = mu
            .into_dimensionality::<Ix1>()
            .map_err(|_| TarnError::ShapeMismatch {
                expected: vec![shape.iter().product()],
                got: shape,
            })?;

        let n = mu.len();
        let n_discrete = composition.discrete_action_dims;
        let n_continuous = match composition.continuous_action_dims {
            0 => n.saturating_sub(n_discrete),
            c => c,
        };
        if n_discrete + n_continuous > n {
            return Err(TarnError::ShapeMismatch {
                expected: vec![n_discrete + n_continuous],
                got: vec![n],
            }
            .into());
        }

        let discrete = mu.slice(s![..n_discrete]).mapv(linalg::sigmoid);
        let mut continuous = mu.slice(s![n - n_continuous..]).to_owned();
        if composition.squash {
            continuous.mapv_inplace(f32::tanh);
        }

        Ok((discrete, continuous))
    }

    /// Concatenates discrete and continuous parts and clips the result to the bounds.
    fn compose(&self, discrete: Array1<f32>, continuous: Array1<f32>) -> Result<Array1<f32>> {
        let mut action = if discrete.is_empty() {
            continuous
        } else {
            concatenate(Axis(0), &[discrete.view(), continuous.view()])?
        };
        if action.len() != self.low.len() {
            return Err(TarnError::ShapeMismatch {
                expected: vec![self.low.len()],
                got: vec![action.len()],
            }
            .into());
        }

        Zip::from(&mut action)
            .and(&self.low)
            .and(&self.high)
            .for_each(|a, &l, &h| *a = a.max(l).min(h));

        Ok(action)
    }
}

impl<A: Approximator> Policy for ClippedGaussianPolicy<A> {
    type Action = Array1<f32>;

    /// The policy carries no state between calls.
    type PolicyState = ();

    fn reset(&self) {}

    fn draw_action<R: Rng + ?Sized>(
        &self,
        state: &ArrayD<f32>,
        _policy_state: &(),
        rng: &mut R,
    ) -> Result<(Array1<f32>, ())> {
        let action = match &self.mode {
            ClippedGaussianMode::Random => self.draw_random_action(rng),
            ClippedGaussianMode::Deterministic(_) => self.draw_deterministic_action(state)?,
            ClippedGaussianMode::Stochastic(c) => self.draw_stochastic_action(state, c, rng)?,
        };
        Ok((action, ()))
    }
}

impl<A: Approximator> ParametricPolicy for ClippedGaussianPolicy<A> {
    fn weights(&self) -> Array1<f32> {
        self.approximator.weights()
    }

    fn set_weights(&mut self, weights: &Array1<f32>) -> Result<()> {
        self.approximator.set_weights(weights)
    }

    fn weights_size(&self) -> usize {
        self.approximator.weights_size()
    }
}

impl<A: Approximator> Persistent for ClippedGaussianPolicy<A> {
    fn save_attrs() -> &'static [(&'static str, SaveAttr)] {
        &[
            ("approximator", SaveAttr::Custom),
            ("chol_sigma", SaveAttr::Tensor),
            ("low", SaveAttr::Tensor),
            ("high", SaveAttr::Tensor),
            ("mode", SaveAttr::Structured),
            ("normalize_states", SaveAttr::Primitive),
            ("normalization", SaveAttr::Structured),
        ]
    }
}
