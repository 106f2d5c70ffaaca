//! Interface of function approximators consumed by the library.
use anyhow::Result;
use ndarray::{Array1, Array2, ArrayD};

/// A function approximator with a flat parameter vector.
///
/// The library never trains or constructs approximators. It only queries them and
/// forwards weight accessors, so any backend can be plugged in by implementing this trait.
pub trait Approximator {
    /// Maps a single state to an output of shape [`Approximator::output_shape`].
    fn predict(&self, state: &ArrayD<f32>) -> Result<ArrayD<f32>>;

    /// Shape of the output of [`Approximator::predict`].
    fn output_shape(&self) -> &[usize];

    /// Returns all parameters as a flat vector.
    fn weights(&self) -> Array1<f32>;

    /// Overwrites all parameters from a flat vector of length [`Approximator::weights_size`].
    fn set_weights(&mut self, weights: &Array1<f32>) -> Result<()>;

    /// Number of parameters.
    fn weights_size(&self) -> usize;
}

/// An approximator of action values over a finite set of actions.
pub trait ActionValues {
    /// Returns the values of all actions for a batch of states.
    ///
    /// The first axis of `states` is the batch axis. The output has shape
    /// `[batch_size, n_actions]`.
    fn predict_all(&self, states: &ArrayD<f32>) -> Result<Array2<f32>>;
}
