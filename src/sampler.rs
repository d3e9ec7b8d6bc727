use crate::config::RunConfig;
use crate::core::errors::Bb84Error;
use crate::protocols::qkd::analysis::analyze;
use crate::protocols::qkd::bb84::run_with;
use crate::rng;
use crate::simulator::{ClosedFormSimulator, QubitSimulator};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Repeats a BB84 run with independent seeds and aggregates the statistics.
///
/// Trial `k` runs with a seed derived from the base seed and `k`, so a whole
/// sample is reproducible from the base configuration.
#[derive(Debug, Clone)]
pub struct Sampler<S = ClosedFormSimulator> {
    /// Configuration shared by every trial. Its seed is the base seed.
    pub config: RunConfig,
    simulator: S,
}

/// Aggregate statistics of a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub trials: usize,
    /// Trials whose sifted key was empty.
    pub empty_keys: usize,
    /// Trials in which Eve was present, including those with an empty key.
    pub eve_runs: usize,
    pub mean_qber: Option<f64>,
    pub mean_qber_with_eve: Option<f64>,
    pub mean_qber_without_eve: Option<f64>,
    pub mean_sifted_length: Option<f64>,
}

impl Sampler<ClosedFormSimulator> {
    /// Creates a new `Sampler` using the closed-form simulator.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            simulator: ClosedFormSimulator,
        }
    }
}

impl<S: QubitSimulator> Sampler<S> {
    /// Sets the simulator backend for every trial.
    pub fn with_simulator<T: QubitSimulator>(self, simulator: T) -> Sampler<T> {
        Sampler {
            config: self.config,
            simulator,
        }
    }

    /// Executes `trials` runs.
    ///
    /// Empty sifted keys are counted rather than treated as failures.
    ///
    /// # Errors
    ///
    /// Returns a `Bb84Error` if:
    /// - `trials` is zero or the configuration is invalid.
    /// - A trial fails for any reason other than an empty sifted key.
    pub fn run(&self, trials: usize) -> Result<SampleSummary, Bb84Error> {
        if trials == 0 {
            return Err(Bb84Error::Configuration(
                "number of trials must be positive".into(),
            ));
        }
        self.config.validate()?;

        let base = rng::resolve_seed(self.config.seed);
        let mut all = Mean::default();
        let mut with_eve = Mean::default();
        let mut without_eve = Mean::default();
        let mut sifted = Mean::default();
        let mut empty_keys = 0;
        let mut eve_runs = 0;

        for k in 0..trials {
            let mut config = self.config.clone();
            config.seed = Some(rng::derive_seed(base, k as u64));

            let run = run_with(&config, &self.simulator)?;
            if run.eve_present {
                eve_runs += 1;
            }
            let key = run.sift()?;

            match analyze(&key.alice, &key.bob) {
                Ok(analysis) => {
                    let qber = analysis.qber;
                    all.push(qber);
                    sifted.push(key.len() as f64);
                    if run.eve_present {
                        with_eve.push(qber);
                    } else {
                        without_eve.push(qber);
                    }
                }
                Err(Bb84Error::EmptyKey) => empty_keys += 1,
                Err(e) => return Err(e),
            }
        }

        let summary = SampleSummary {
            trials,
            empty_keys,
            eve_runs,
            mean_qber: all.value(),
            mean_qber_with_eve: with_eve.value(),
            mean_qber_without_eve: without_eve.value(),
            mean_sifted_length: sifted.value(),
        };
        info!(
            trials,
            empty_keys,
            eve_runs,
            mean_qber = ?summary.mean_qber,
            "sample complete"
        );
        Ok(summary)
    }
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, x: f64) {
        self.sum += x;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}
