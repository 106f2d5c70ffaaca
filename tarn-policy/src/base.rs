//! Policy interfaces.
use anyhow::Result;
use ndarray::{Array1, ArrayD};
use rand::Rng;
use tarn_core::TarnError;

/// A stochastic policy.
///
/// A policy does not hold the state of its random process. The caller obtains the
/// initial policy state with [`Policy::reset`] and threads the state returned by
/// [`Policy::draw_action`] into the next call.
pub trait Policy {
    /// Action.
    type Action;

    /// State of the random process carried between calls.
    type PolicyState;

    /// Returns the initial policy state.
    fn reset(&self) -> Self::PolicyState;

    /// Samples an action given a state and the current policy state.
    ///
    /// Returns the action and the next policy state.
    fn draw_action<R: Rng + ?Sized>(
        &self,
        state: &ArrayD<f32>,
        policy_state: &Self::PolicyState,
        rng: &mut R,
    ) -> Result<(Self::Action, Self::PolicyState)>;

    /// Evaluates the density of `action` in `state`.
    ///
    /// Policies that only support sampling return [`TarnError::NotImplemented`].
    fn density(
        &self,
        _state: &ArrayD<f32>,
        _action: &Self::Action,
        _policy_state: &Self::PolicyState,
    ) -> Result<f32> {
        Err(TarnError::NotImplemented("density evaluation of a sampling-only policy".into()).into())
    }
}

/// A policy parametrized by the weights of an approximator.
///
/// The weights are owned by the approximator. The policy only forwards the accessors.
pub trait ParametricPolicy: Policy {
    /// Returns the weights as a flat vector.
    fn weights(&self) -> Array1<f32>;

    /// Sets the weights from a flat vector.
    fn set_weights(&mut self, weights: &Array1<f32>) -> Result<()>;

    /// Number of weights.
    fn weights_size(&self) -> usize;
}
