//! Dense linear algebra used by the policies.
use ndarray::Array2;
use tarn_core::TarnError;

/// Relative tolerance of the symmetry check in [`cholesky`].
const SYMMETRY_TOL: f64 = 1e-10;

/// Computes the lower-triangular Cholesky factor `L` of `a`, such that `L L^T = a`.
///
/// `a` must be square, symmetric and positive-definite. Otherwise
/// [`TarnError::InvalidCovariance`] is returned.
pub fn cholesky(a: &Array2<f64>) -> Result<Array2<f64>, TarnError> {
    let (n, m) = a.dim();
    if n != m {
        return Err(TarnError::InvalidCovariance(format!(
            "matrix of shape [{}, {}] is not square",
            n, m
        )));
    }

    for i in 0..n {
        for j in 0..i {
            let (x, y) = (a[[i, j]], a[[j, i]]);
            if (x - y).abs() > SYMMETRY_TOL * (1.0 + x.abs().max(y.abs())) {
                return Err(TarnError::InvalidCovariance(format!(
                    "matrix is not symmetric at ({}, {})",
                    i, j
                )));
            }
        }
    }

    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let d = a[[j, j]] - (0..j).map(|k| l[[j, k]] * l[[j, k]]).sum::<f64>();
        // Also rejects NaN
        if !(d > 0.0) {
            return Err(TarnError::InvalidCovariance(format!(
                "matrix is not positive-definite (pivot {} = {})",
                j, d
            )));
        }
        let l_jj = d.sqrt();
        l[[j, j]] = l_jj;

        for i in (j + 1)..n {
            let s = a[[i, j]] - (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum::<f64>();
            l[[i, j]] = s / l_jj;
        }
    }

    Ok(l)
}

/// Logistic sigmoid.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    #[test]
    fn test_cholesky_2x2() -> anyhow::Result<()> {
        let l = cholesky(&arr2(&[[4.0, 2.0], [2.0, 3.0]]))?;
        assert_abs_diff_eq!(l[[0, 0]], 2.0);
        assert_abs_diff_eq!(l[[0, 1]], 0.0);
        assert_abs_diff_eq!(l[[1, 0]], 1.0);
        assert_abs_diff_eq!(l[[1, 1]], 2f64.sqrt(), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_cholesky_reconstruction() -> anyhow::Result<()> {
        let a = arr2(&[[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]]);
        let l = cholesky(&a)?;
        let a_ = l.dot(&l.t());
        for (x, y) in a.iter().zip(a_.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }

        // Lower triangular
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert_eq!(l[[i, j]], 0.0);
            }
        }
        Ok(())
    }

    #[test]
    fn test_cholesky_invalid() {
        let is_invalid = |a: Array2<f64>| matches!(cholesky(&a), Err(TarnError::InvalidCovariance(_)));

        // indefinite
        assert!(is_invalid(arr2(&[[1.0, 2.0], [2.0, 1.0]])));
        // singular
        assert!(is_invalid(arr2(&[[1.0, 1.0], [1.0, 1.0]])));
        // negative variance
        assert!(is_invalid(arr2(&[[-1.0]])));
        // asymmetric
        assert!(is_invalid(arr2(&[[2.0, 0.5], [0.0, 2.0]])));
        // not square
        assert!(is_invalid(Array2::zeros((2, 3))));
        // NaN
        assert!(is_invalid(arr2(&[[f64::NAN]])));
    }

    #[test]
    fn test_sigmoid() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.9999);
        assert!(sigmoid(-10.0) < 0.0001);
        assert_abs_diff_eq!(sigmoid(1.5) + sigmoid(-1.5), 1.0, epsilon = 1e-6);
    }
}
