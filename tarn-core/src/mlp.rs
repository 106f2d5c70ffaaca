//! Multilayer perceptron without a deep learning backend.
mod base;
mod config;
pub use base::Mlp;
pub use config::MlpConfig;
use ndarray::{Array1, Array2};

fn mlp_forward(x: Array1<f32>, ws: &[Array2<f32>], bs: &[Array1<f32>]) -> Array1<f32> {
    let n_layers = ws.len();
    let mut x = x;
    for (i, (w, b)) in ws.iter().zip(bs.iter()).enumerate() {
        x = w.dot(&x) + b;
        if i != n_layers - 1 {
            x.mapv_inplace(|v| v.max(0.0));
        }
    }
    x
}
