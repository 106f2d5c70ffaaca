//! Decomposition of a dataset into parallel arrays.
use super::Transition;
use crate::error::TarnError;
use ndarray::{Array1, ArrayD, Axis, IxDyn};

/// A dataset split into its components, one row per transition.
///
/// All arrays share the same leading dimension, the number of transitions.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedDataset {
    /// States, shape `[n, ...state_shape]`.
    pub states: ArrayD<f32>,

    /// Actions, shape `[n, ...action_shape]`.
    pub actions: ArrayD<f32>,

    /// Rewards, shape `[n]`.
    pub rewards: Array1<f32>,

    /// Next states, shape `[n, ...state_shape]`.
    pub next_states: ArrayD<f32>,

    /// Absorbing flags, shape `[n]`.
    pub absorbing: Array1<bool>,

    /// Last-step flags, shape `[n]`.
    pub last: Array1<bool>,
}

impl ParsedDataset {
    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Returns `true` if there is no row.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Reassembles the `i`-th row into a [`Transition`].
    pub fn row(&self, i: usize) -> Option<Transition> {
        if i >= self.len() {
            return None;
        }
        Some(Transition {
            state: self.states.index_axis(Axis(0), i).to_owned(),
            action: self.actions.index_axis(Axis(0), i).to_owned(),
            reward: self.rewards[i],
            next_state: self.next_states.index_axis(Axis(0), i).to_owned(),
            absorbing: self.absorbing[i],
            last: self.last[i],
        })
    }

    /// Creates a dataset without rows.
    ///
    /// Trailing shapes are taken from `template` if given. Otherwise state and action
    /// arrays are one-dimensional with zero length.
    pub(crate) fn empty_like(template: Option<&Transition>) -> Self {
        let zeros = |shape: Option<&[usize]>| {
            let mut full = vec![0];
            full.extend_from_slice(shape.unwrap_or(&[]));
            ArrayD::zeros(IxDyn(&full))
        };
        Self {
            states: zeros(template.map(|t| t.state.shape())),
            actions: zeros(template.map(|t| t.action.shape())),
            rewards: Array1::zeros(0),
            next_states: zeros(template.map(|t| t.next_state.shape())),
            absorbing: Array1::from_elem(0, false),
            last: Array1::from_elem(0, false),
        }
    }
}

/// Stacks arrays of identical shape along a new leading axis.
fn stack<'a>(
    arrays: impl Iterator<Item = &'a ArrayD<f32>>,
    n: usize,
    shape: &[usize],
) -> Result<ArrayD<f32>, TarnError> {
    let mut data = Vec::with_capacity(n * shape.iter().product::<usize>());
    for a in arrays {
        if a.shape() != shape {
            return Err(TarnError::ShapeMismatch {
                expected: shape.to_vec(),
                got: a.shape().to_vec(),
            });
        }
        data.extend(a.iter().copied());
    }

    let mut full_shape = Vec::with_capacity(shape.len() + 1);
    full_shape.push(n);
    full_shape.extend_from_slice(shape);
    let got = vec![data.len()];
    ArrayD::from_shape_vec(IxDyn(&full_shape), data).map_err(|_| TarnError::ShapeMismatch {
        expected: full_shape.clone(),
        got,
    })
}

/// Splits a dataset into states, actions, rewards, next states, absorbing and last flags.
///
/// Rows keep the order of the input. Shapes are taken from the first transition and every
/// other transition must match them, otherwise [`TarnError::ShapeMismatch`] is returned.
/// An empty input is rejected with [`TarnError::EmptyInput`].
///
/// `dataset` can be a slice of transitions or any iterator of references to them,
/// e.g., the output of [`select_samples`](super::select_samples).
pub fn parse_dataset<'a, I>(dataset: I) -> Result<ParsedDataset, TarnError>
where
    I: IntoIterator<Item = &'a Transition>,
{
    let rows: Vec<&Transition> = dataset.into_iter().collect();
    let first = rows.first().ok_or(TarnError::EmptyInput)?;
    let n = rows.len();

    let states = stack(rows.iter().map(|t| &t.state), n, first.state.shape())?;
    let actions = stack(rows.iter().map(|t| &t.action), n, first.action.shape())?;
    let next_states = stack(rows.iter().map(|t| &t.next_state), n, first.next_state.shape())?;

    Ok(ParsedDataset {
        states,
        actions,
        rewards: rows.iter().map(|t| t.reward).collect(),
        next_states,
        absorbing: rows.iter().map(|t| t.absorbing).collect(),
        last: rows.iter().map(|t| t.last).collect(),
    })
}
