//! Configuration of [`OrnsteinUhlenbeckPolicy`](super::OrnsteinUhlenbeckPolicy).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`OrnsteinUhlenbeckPolicy`](super::OrnsteinUhlenbeckPolicy).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct OrnsteinUhlenbeckPolicyConfig {
    /// Magnitude of the random fluctuations per square-root time.
    ///
    /// Either a single value shared by all components or one value per component
    /// of the approximator output.
    pub sigma: Vec<f32>,

    /// Rate of mean reversion.
    pub theta: f32,

    /// Time interval of a step.
    pub dt: f32,

    /// Initial value of the noise. If `None`, the noise starts from zero.
    pub x0: Option<Vec<f32>>,
}

impl Default for OrnsteinUhlenbeckPolicyConfig {
    fn default() -> Self {
        Self {
            sigma: vec![0.2],
            theta: 0.15,
            dt: 1e-2,
            x0: None,
        }
    }
}

impl OrnsteinUhlenbeckPolicyConfig {
    /// Sets `sigma`.
    pub fn sigma(mut self, v: Vec<f32>) -> Self {
        self.sigma = v;
        self
    }

    /// Sets `theta`.
    pub fn theta(mut self, v: f32) -> Self {
        self.theta = v;
        self
    }

    /// Sets `dt`.
    pub fn dt(mut self, v: f32) -> Self {
        self.dt = v;
        self
    }

    /// Sets the initial value of the noise.
    pub fn x0(mut self, v: Option<Vec<f32>>) -> Self {
        self.x0 = v;
        self
    }

    /// Constructs [`OrnsteinUhlenbeckPolicyConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`OrnsteinUhlenbeckPolicyConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
