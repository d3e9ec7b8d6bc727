//! Run configuration.

use crate::core::errors::Bb84Error;
use serde::{Deserialize, Serialize};

/// Whether Eve intercepts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvePolicy {
    /// Present with probability 1/2, drawn once per run.
    #[default]
    Random,
    Always,
    Never,
}

/// What Eve forwards to Bob after measuring a qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterceptStrategy {
    /// A fresh uniformly random bit in her basis, independent of what she
    /// measured. Bob's sifted bits become uncorrelated with Alice's, so the
    /// expected QBER is 1/2.
    #[default]
    RandomResend,
    /// Her own measured bit in her basis (textbook intercept-resend, expected
    /// QBER 1/4).
    MeasureResend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of qubits Alice sends.
    pub num_qubits: usize,
    /// Bit-flip probability on the channel when Eve is absent.
    pub noise_probability: f64,
    /// Run seed. `None` draws a fresh seed, which is recorded in the report.
    pub seed: Option<u64>,
    pub eve: EvePolicy,
    pub intercept: InterceptStrategy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_qubits: 100,
            noise_probability: 0.05,
            seed: None,
            eve: EvePolicy::Random,
            intercept: InterceptStrategy::RandomResend,
        }
    }
}

impl RunConfig {
    pub fn new(num_qubits: usize, noise_probability: f64) -> Self {
        Self {
            num_qubits,
            noise_probability,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_eve(mut self, eve: EvePolicy) -> Self {
        self.eve = eve;
        self
    }

    pub fn with_intercept(mut self, intercept: InterceptStrategy) -> Self {
        self.intercept = intercept;
        self
    }

    pub fn with_noise(mut self, noise_probability: f64) -> Self {
        self.noise_probability = noise_probability;
        self
    }

    /// # Errors
    ///
    /// Returns `Bb84Error::Configuration` if `num_qubits` is zero or
    /// `noise_probability` is not within [0.0, 1.0].
    pub fn validate(&self) -> Result<(), Bb84Error> {
        if self.num_qubits == 0 {
            return Err(Bb84Error::Configuration(
                "number of qubits must be positive".into(),
            ));
        }
        validate_prob(self.noise_probability)
    }
}

/// Validate probability parameter
pub(crate) fn validate_prob(p: f64) -> Result<(), Bb84Error> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Bb84Error::Configuration(format!(
            "noise probability {p} must be between 0.0 and 1.0"
        )));
    }
    Ok(())
}
