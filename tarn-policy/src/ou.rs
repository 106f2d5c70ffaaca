//! Ornstein-Uhlenbeck noise policy.
//!
//! The policy adds temporally correlated noise to the output of a mean approximator,
//! following the exploration scheme commonly used with deep deterministic policy gradient.
mod config;
use crate::{ParametricPolicy, Policy};
use anyhow::Result;
pub use config::OrnsteinUhlenbeckPolicyConfig;
use log::{info, trace};
use ndarray::{Array1, ArrayD, IxDyn};
use rand::Rng;
use rand_distr::StandardNormal;
use tarn_core::{Approximator, Persistent, SaveAttr, TarnError};

/// Converts a config vector into an array of the given shape.
///
/// A single value is broadcast to the whole shape if `broadcast` is `true`.
fn to_array(name: &str, v: &[f32], shape: &[usize], broadcast: bool) -> Result<ArrayD<f32>> {
    let n: usize = shape.iter().product();
    if broadcast && v.len() == 1 {
        Ok(ArrayD::from_elem(IxDyn(shape), v[0]))
    } else if v.len() == n {
        Ok(ArrayD::from_shape_vec(IxDyn(shape), v.to_vec())?)
    } else {
        Err(TarnError::InvalidArgument(format!(
            "{} has {} elements, but the approximator output has {}",
            name,
            v.len(),
            n
        ))
        .into())
    }
}

/// Ornstein-Uhlenbeck noise policy.
///
/// Given the previous noise `x` as the policy state, a step of the discretized process is
///
/// ```text
/// x' = x - theta * x * dt + sigma * sqrt(dt) * N(0, I)
/// ```
///
/// and the action is `mu(s) + x'`, where `mu` is the mean approximator.
/// The policy returns `x'` as the next policy state and keeps no copy of it.
pub struct OrnsteinUhlenbeckPolicy<A: Approximator> {
    approximator: A,
    sigma: ArrayD<f32>,
    theta: f32,
    dt: f32,
    x0: Option<ArrayD<f32>>,
}

impl<A: Approximator> OrnsteinUhlenbeckPolicy<A> {
    /// Builds the policy with a mean approximator.
    pub fn build(approximator: A, config: &OrnsteinUhlenbeckPolicyConfig) -> Result<Self> {
        if !(config.dt >= 0.0) {
            return Err(TarnError::InvalidArgument(format!("dt = {} is negative", config.dt)).into());
        }
        let shape = approximator.output_shape().to_vec();
        let sigma = to_array("sigma", &config.sigma, &shape, true)?;
        let x0 = match &config.x0 {
            Some(x0) => Some(to_array("x0", x0, &shape, false)?),
            None => None,
        };
        info!(
            "Build Ornstein-Uhlenbeck policy: output shape = {:?}, theta = {}, dt = {}",
            shape, config.theta, config.dt
        );

        Ok(Self {
            approximator,
            sigma,
            theta: config.theta,
            dt: config.dt,
            x0,
        })
    }

    /// Returns a reference to the mean approximator.
    pub fn approximator(&self) -> &A {
        &self.approximator
    }

    /// Same as [`Policy::draw_action`], but with the given standard normal `noise`.
    ///
    /// `policy_state` and `noise` must have the shape of the approximator output.
    pub fn draw_action_with_noise(
        &self,
        state: &ArrayD<f32>,
        policy_state: &ArrayD<f32>,
        noise: &ArrayD<f32>,
    ) -> Result<(ArrayD<f32>, ArrayD<f32>)> {
        let shape = self.approximator.output_shape();
        for a in [policy_state, noise] {
            if a.shape() != shape {
                return Err(TarnError::ShapeMismatch {
                    expected: shape.to_vec(),
                    got: a.shape().to_vec(),
                }
                .into());
            }
        }
        let mu = self.approximator.predict(state)?;
        if mu.shape() != shape {
            return Err(TarnError::ShapeMismatch {
                expected: shape.to_vec(),
                got: mu.shape().to_vec(),
            }
            .into());
        }

        let x = policy_state - &(policy_state * (self.theta * self.dt))
            + &(&self.sigma * self.dt.sqrt() * noise);
        trace!("Ornstein-Uhlenbeck noise: {}", x);

        Ok((mu + &x, x))
    }
}

impl<A: Approximator> Policy for OrnsteinUhlenbeckPolicy<A> {
    type Action = ArrayD<f32>;
    type PolicyState = ArrayD<f32>;

    /// Returns `x0` if given in the configuration, zeros otherwise.
    fn reset(&self) -> ArrayD<f32> {
        match &self.x0 {
            Some(x0) => x0.clone(),
            None => ArrayD::zeros(IxDyn(self.approximator.output_shape())),
        }
    }

    fn draw_action<R: Rng + ?Sized>(
        &self,
        state: &ArrayD<f32>,
        policy_state: &ArrayD<f32>,
        rng: &mut R,
    ) -> Result<(ArrayD<f32>, ArrayD<f32>)> {
        let noise = ArrayD::from_shape_simple_fn(IxDyn(self.approximator.output_shape()), || {
            rng.sample::<f32, _>(StandardNormal)
        });
        self.draw_action_with_noise(state, policy_state, &noise)
    }
}

impl<A: Approximator> ParametricPolicy for OrnsteinUhlenbeckPolicy<A> {
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

impl<A: Approximator> Persistent for OrnsteinUhlenbeckPolicy<A> {
    fn save_attrs() -> &'static [(&'static str, SaveAttr)] {
        &[
            ("approximator", SaveAttr::Custom),
            ("sigma", SaveAttr::Tensor),
            ("theta", SaveAttr::Primitive),
            ("dt", SaveAttr::Primitive),
            ("x0", SaveAttr::Tensor),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2};
    use rand::{rngs::StdRng, SeedableRng};
    use tarn_core::Mlp;

    /// Linear approximator `mu(s) = W s + b` with a 2-dim output.
    fn linear() -> Mlp {
        let w = arr2(&[[1.0, 0.0], [0.0, -1.0]]);
        let b = arr1(&[0.5, 0.0]);
        Mlp::from_layers(vec![w], vec![b]).unwrap()
    }

    fn policy(config: OrnsteinUhlenbeckPolicyConfig) -> OrnsteinUhlenbeckPolicy<Mlp> {
        OrnsteinUhlenbeckPolicy::build(linear(), &config).unwrap()
    }

    #[test]
    fn test_reset() {
        let p = policy(OrnsteinUhlenbeckPolicyConfig::default());
        assert_eq!(p.reset(), ArrayD::<f32>::zeros(IxDyn(&[2])));

        let p = policy(OrnsteinUhlenbeckPolicyConfig::default().x0(Some(vec![1.0, 2.0])));
        assert_eq!(p.reset(), arr1(&[1.0, 2.0]).into_dyn());
    }

    #[test]
    fn test_recurrence_with_fixed_noise() -> Result<()> {
        let (sigma, theta, dt) = (0.3f32, 0.15f32, 0.01f32);
        let p = policy(
            OrnsteinUhlenbeckPolicyConfig::default()
                .sigma(vec![sigma])
                .theta(theta)
                .dt(dt)
                .x0(Some(vec![1.0, -2.0])),
        );
        let state = arr1(&[1.0, 2.0]).into_dyn();
        let mu = arr1(&[1.5, -2.0]);
        let noises = [[0.5f32, -1.0], [1.5, 0.0], [-0.3, 0.7], [0.0, 0.0]];

        let mut x = p.reset();
        let mut x_expected = [1.0f32, -2.0];
        for n in noises.iter() {
            let noise = arr1(n).into_dyn();
            let (act, x_next) = p.draw_action_with_noise(&state, &x, &noise)?;
            for i in 0..2 {
                x_expected[i] =
                    x_expected[i] - theta * x_expected[i] * dt + sigma * dt.sqrt() * n[i];
                assert_abs_diff_eq!(x_next[i], x_expected[i], epsilon = 1e-6);
                assert_abs_diff_eq!(act[i], mu[i] + x_expected[i], epsilon = 1e-6);
            }
            x = x_next;
        }

        Ok(())
    }

    #[test]
    fn test_draw_action_uses_standard_normal() -> Result<()> {
        let p = policy(OrnsteinUhlenbeckPolicyConfig::default().sigma(vec![0.2, 0.4]));
        let state = arr1(&[0.0, 1.0]).into_dyn();
        let x = p.reset();

        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        let noise = ArrayD::from_shape_simple_fn(IxDyn(&[2]), || {
            rng2.sample::<f32, _>(StandardNormal)
        });

        let (act1, x1) = p.draw_action(&state, &x, &mut rng1)?;
        let (act2, x2) = p.draw_action_with_noise(&state, &x, &noise)?;
        assert_eq!(act1, act2);
        assert_eq!(x1, x2);

        // The policy keeps no state: the same inputs give the same outputs
        let (act3, _) = p.draw_action_with_noise(&state, &x, &noise)?;
        assert_eq!(act2, act3);

        Ok(())
    }

    #[test]
    fn test_mean_reversion() -> Result<()> {
        let p = policy(
            OrnsteinUhlenbeckPolicyConfig::default()
                .sigma(vec![0.0])
                .theta(1.0)
                .dt(0.5)
                .x0(Some(vec![4.0, -4.0])),
        );
        let state = arr1(&[0.0, 0.0]).into_dyn();
        let mut rng = StdRng::seed_from_u64(0);
        let mut x = p.reset();
        for _ in 0..3 {
            let (_, x_next) = p.draw_action(&state, &x, &mut rng)?;
            x = x_next;
        }
        assert_eq!(x, arr1(&[0.5, -0.5]).into_dyn());
        Ok(())
    }

    #[test]
    fn test_build_invalid() {
        let build = |config| OrnsteinUhlenbeckPolicy::build(linear(), &config);

        assert!(build(OrnsteinUhlenbeckPolicyConfig::default().sigma(vec![0.1, 0.2, 0.3])).is_err());
        assert!(build(OrnsteinUhlenbeckPolicyConfig::default().x0(Some(vec![0.0]))).is_err());
        let err = build(OrnsteinUhlenbeckPolicyConfig::default().dt(-1.0)).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<TarnError>(),
            Some(TarnError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let p = policy(OrnsteinUhlenbeckPolicyConfig::default());
        let state = arr1(&[0.0, 1.0]).into_dyn();
        let x = ArrayD::zeros(IxDyn(&[3]));
        let mut rng = StdRng::seed_from_u64(0);
        let err = p.draw_action(&state, &x, &mut rng).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TarnError>(),
            Some(&TarnError::ShapeMismatch {
                expected: vec![2],
                got: vec![3]
            })
        );
    }

    #[test]
    fn test_density_not_implemented() {
        let p = policy(OrnsteinUhlenbeckPolicyConfig::default());
        let state = arr1(&[0.0, 1.0]).into_dyn();
        let x = p.reset();
        let err = p.density(&state, &x, &x).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TarnError>(),
            Some(TarnError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_weights_delegate() -> Result<()> {
        let mut p = policy(OrnsteinUhlenbeckPolicyConfig::default());
        assert_eq!(p.weights_size(), 6);
        assert_eq!(p.weights(), p.approximator().weights());

        let w = Array1::from_iter((0..6).map(|i| i as f32));
        p.set_weights(&w)?;
        assert_eq!(p.approximator().weights(), w);
        Ok(())
    }

    #[test]
    fn test_save_attrs() {
        type P = OrnsteinUhlenbeckPolicy<Mlp>;
        assert_eq!(P::save_attr("approximator"), Some(SaveAttr::Custom));
        assert_eq!(P::save_attr("theta"), Some(SaveAttr::Primitive));
        assert_eq!(P::save_attr("x0"), Some(SaveAttr::Tensor));
    }
}
