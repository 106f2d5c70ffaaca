use super::{mlp_forward, MlpConfig};
use crate::{
    approximator::{ActionValues, Approximator},
    error::TarnError,
};
use anyhow::Result;
use ndarray::{Array1, Array2, ArrayD, ArrayView, Axis, Dimension, IxDyn};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
/// Multilayer perceptron with ReLU activation function.
///
/// The output layer is linear. Inputs are flattened in logical order before the
/// forward pass, so states of any shape with `in_dim` elements are accepted.
pub struct Mlp {
    /// Weights of layers, `[out_dim, in_dim]` each.
    ws: Vec<Array2<f32>>,

    /// Biases of layers.
    bs: Vec<Array1<f32>>,

    /// Shape of the output, `[out_dim]`.
    out_shape: Vec<usize>,
}

impl Mlp {
    /// Builds an MLP with all parameters set to zero.
    pub fn build(config: &MlpConfig) -> Self {
        let (ws, bs) = config
            .in_out_pairs()
            .into_iter()
            .map(|(i, o)| (Array2::zeros((o, i)), Array1::zeros(o)))
            .unzip();

        Self {
            ws,
            bs,
            out_shape: vec![config.out_dim],
        }
    }

    /// Builds an MLP from the given layers.
    ///
    /// The number of columns of each weight matrix must equal the number of rows of the
    /// previous one, and each bias must match the rows of its weight matrix.
    pub fn from_layers(ws: Vec<Array2<f32>>, bs: Vec<Array1<f32>>) -> Result<Self> {
        if ws.is_empty() || ws.len() != bs.len() {
            return Err(TarnError::InvalidArgument(format!(
                "{} weight matrices and {} biases given",
                ws.len(),
                bs.len()
            ))
            .into());
        }
        for (i, (w, b)) in ws.iter().zip(bs.iter()).enumerate() {
            if w.nrows() != b.len() {
                return Err(TarnError::ShapeMismatch {
                    expected: vec![w.nrows()],
                    got: vec![b.len()],
                }
                .into());
            }
            if i > 0 && ws[i - 1].nrows() != w.ncols() {
                return Err(TarnError::ShapeMismatch {
                    expected: vec![w.nrows(), ws[i - 1].nrows()],
                    got: w.shape().to_vec(),
                }
                .into());
            }
        }
        let out_shape = vec![ws[ws.len() - 1].nrows()];

        Ok(Self { ws, bs, out_shape })
    }

    /// Dimension of the input.
    pub fn in_dim(&self) -> usize {
        self.ws[0].ncols()
    }

    fn forward<D: Dimension>(&self, x: ArrayView<f32, D>) -> Result<Array1<f32>> {
        if x.len() != self.in_dim() {
            return Err(TarnError::ShapeMismatch {
                expected: vec![self.in_dim()],
                got: x.shape().to_vec(),
            }
            .into());
        }
        let x: Array1<f32> = x.iter().copied().collect();
        Ok(mlp_forward(x, &self.ws, &self.bs))
    }
}

impl Approximator for Mlp {
    fn predict(&self, state: &ArrayD<f32>) -> Result<ArrayD<f32>> {
        let y = self.forward(state.view())?;
        Ok(y.into_shape(IxDyn(&self.out_shape))?)
    }

    fn output_shape(&self) -> &[usize] {
        &self.out_shape
    }

    fn weights(&self) -> Array1<f32> {
        self.ws
            .iter()
            .zip(self.bs.iter())
            .flat_map(|(w, b)| w.iter().chain(b.iter()).copied())
            .collect()
    }

    fn set_weights(&mut self, weights: &Array1<f32>) -> Result<()> {
        if weights.len() != self.weights_size() {
            return Err(TarnError::ShapeMismatch {
                expected: vec![self.weights_size()],
                got: vec![weights.len()],
            }
            .into());
        }

        let mut src = weights.iter();
        for (w, b) in self.ws.iter_mut().zip(self.bs.iter_mut()) {
            w.iter_mut()
                .chain(b.iter_mut())
                .zip(&mut src)
                .for_each(|(dst, v)| *dst = *v);
        }

        Ok(())
    }

    fn weights_size(&self) -> usize {
        self.ws
            .iter()
            .zip(self.bs.iter())
            .map(|(w, b)| w.len() + b.len())
            .sum()
    }
}

impl ActionValues for Mlp {
    fn predict_all(&self, states: &ArrayD<f32>) -> Result<Array2<f32>> {
        if states.ndim() == 0 {
            return Err(TarnError::InvalidArgument("states without batch axis".to_string()).into());
        }
        let batch_size = states.shape()[0];
        let mut q = Array2::zeros((batch_size, self.out_shape[0]));
        for (mut row, state) in q.axis_iter_mut(Axis(0)).zip(states.axis_iter(Axis(0))) {
            row.assign(&self.forward(state)?);
        }
        Ok(q)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{arr1, arr2, s};

    fn two_layers() -> Mlp {
        // Hidden layer duplicates the input with opposite signs, output sums them up.
        let w1 = arr2(&[[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]]);
        let b1 = arr1(&[0.0, 0.0, 0.0]);
        let w2 = arr2(&[[1.0, 1.0, 1.0], [0.0, 2.0, 0.0]]);
        let b2 = arr1(&[0.5, -0.5]);
        Mlp::from_layers(vec![w1, w2], vec![b1, b2]).unwrap()
    }

    #[test]
    fn test_predict() -> Result<()> {
        let mlp = two_layers();
        assert_eq!(mlp.output_shape(), &[2]);
        assert_eq!(mlp.in_dim(), 2);

        // hidden = relu([2, 3, -2]) = [2, 3, 0]
        let y = mlp.predict(&arr1(&[2.0, 3.0]).into_dyn())?;
        assert_eq!(y, arr1(&[5.5, 5.5]).into_dyn());

        // hidden = relu([-1, 1, 1]) = [0, 1, 1]
        let y = mlp.predict(&arr1(&[-1.0, 1.0]).into_dyn())?;
        assert_eq!(y, arr1(&[2.5, 1.5]).into_dyn());

        assert!(mlp.predict(&arr1(&[1.0, 2.0, 3.0]).into_dyn()).is_err());

        Ok(())
    }

    #[test]
    fn test_predict_all() -> Result<()> {
        let mlp = two_layers();
        let states = arr2(&[[2.0, 3.0], [-1.0, 1.0]]).into_dyn();
        let q = mlp.predict_all(&states)?;
        assert_eq!(q, arr2(&[[5.5, 5.5], [2.5, 1.5]]));
        Ok(())
    }

    #[test]
    fn test_weights() -> Result<()> {
        let mut mlp = two_layers();
        assert_eq!(mlp.weights_size(), 6 + 3 + 6 + 2);

        let w = mlp.weights();
        assert_eq!(w.len(), mlp.weights_size());
        assert_eq!(w[0], 1.0);
        assert_eq!(w.slice(s![6..9]).to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(w.slice(s![15..]).to_vec(), vec![0.5, -0.5]);

        let mut zeros = Mlp::build(&MlpConfig::new(2, vec![3], 2));
        assert_eq!(zeros.weights_size(), mlp.weights_size());
        zeros.set_weights(&w)?;
        assert_eq!(zeros, mlp);

        let w2 = Array1::from_iter((0..17).map(|i| i as f32));
        mlp.set_weights(&w2)?;
        assert_eq!(mlp.weights(), w2);

        let err = mlp.set_weights(&Array1::zeros(3)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TarnError>(),
            Some(&TarnError::ShapeMismatch {
                expected: vec![17],
                got: vec![3]
            })
        );

        Ok(())
    }

    #[test]
    fn test_from_layers_invalid() {
        let w1 = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let w2 = arr2(&[[1.0, 1.0, 1.0]]);
        assert!(Mlp::from_layers(vec![w1.clone(), w2], vec![arr1(&[0.0, 0.0]), arr1(&[0.0])]).is_err());
        assert!(Mlp::from_layers(vec![w1], vec![arr1(&[0.0])]).is_err());
        assert!(Mlp::from_layers(vec![], vec![]).is_err());
    }
}
