use anyhow::Result;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use tarn_core::TarnError;

/// Statistics used to standardize states, `(s - mean) / std`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct StateNormalization {
    mean: ArrayD<f32>,
    std: ArrayD<f32>,
}

impl StateNormalization {
    /// Creates normalization statistics. `mean` and `std` must have the same shape.
    pub fn new(mean: ArrayD<f32>, std: ArrayD<f32>) -> Result<Self> {
        if mean.shape() != std.shape() {
            return Err(TarnError::InvalidArgument(format!(
                "mean of shape {:?} and std of shape {:?}",
                mean.shape(),
                std.shape()
            ))
            .into());
        }
        Ok(Self { mean, std })
    }

    /// Mean of states.
    pub fn mean(&self) -> &ArrayD<f32> {
        &self.mean
    }

    /// Standard deviation of states.
    pub fn std(&self) -> &ArrayD<f32> {
        &self.std
    }

    /// Standardizes a state.
    pub fn apply(&self, state: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        if state.shape() != self.mean.shape() {
            return Err(TarnError::ShapeMismatch {
                expected: self.mean.shape().to_vec(),
                got: state.shape().to_vec(),
            }
            .into());
        }
        Ok((state - &self.mean) / &self.std)
    }
}
