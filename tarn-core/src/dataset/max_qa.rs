//! Greedy action values over a batch of states.
use crate::{approximator::ActionValues, error::TarnError};
use anyhow::Result;
use ndarray::{Array1, Array2, ArrayD, ArrayView1, Axis};
use rand::{seq::SliceRandom, Rng};

fn row_max(q: &ArrayView1<f32>) -> f32 {
    q.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Returns the maximum action value of each state and the action attaining it.
///
/// Values of states flagged as absorbing are set to zero before taking the maximum.
/// The actions are returned as a column vector of shape `[batch_size, 1]`.
///
/// Ties are broken differently depending on the batch size. For a single state, an action
/// is drawn uniformly at random among the maximizers. For larger batches, the first
/// maximizer is taken.
pub fn max_qa<A, R>(
    states: &ArrayD<f32>,
    absorbing: &[bool],
    approximator: &A,
    rng: &mut R,
) -> Result<(Array1<f32>, Array2<usize>)>
where
    A: ActionValues + ?Sized,
    R: Rng + ?Sized,
{
    let mut q = approximator.predict_all(states)?;
    let (n, n_actions) = q.dim();
    if absorbing.len() != n {
        return Err(TarnError::ShapeMismatch {
            expected: vec![n],
            got: vec![absorbing.len()],
        }
        .into());
    }
    if n_actions == 0 {
        return Err(TarnError::InvalidArgument("no action values".to_string()).into());
    }

    for (mut row, _) in q
        .axis_iter_mut(Axis(0))
        .zip(absorbing.iter())
        .filter(|(_, a)| **a)
    {
        row.fill(0.0);
    }

    let max_q: Array1<f32> = q.axis_iter(Axis(0)).map(|row| row_max(&row)).collect();
    let max_a: Vec<usize> = if n == 1 {
        let row = q.row(0);
        let tied = row
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == max_q[0])
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        vec![tied.choose(rng).copied().unwrap_or(0)]
    } else {
        q.axis_iter(Axis(0))
            .zip(max_q.iter())
            .map(|(row, &m)| row.iter().position(|&v| v == m).unwrap_or(0))
            .collect()
    };

    Ok((max_q, Array2::from_shape_vec((n, 1), max_a)?))
}
