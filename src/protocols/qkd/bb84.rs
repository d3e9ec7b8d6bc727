//! BB84 protocol run.
//!
//! A run draws every party's bits and bases up front from one seeded
//! generator, sends the `n` qubits through a [`QubitChannel`], then sifts and
//! analyzes the resulting key pair.

use super::analysis::{Analysis, analyze};
use super::channel::{QubitChannel, Transmission};
use super::sifting::{SiftedKey, sift};
use crate::config::{EvePolicy, RunConfig};
use crate::core::errors::Bb84Error;
use crate::core::qubit::{Basis, random_bases, random_bits};
use crate::rng;
use crate::simulator::{ClosedFormSimulator, QubitSimulator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Raw outcome of sending `n` qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolRun {
    /// Seed the run was drawn from.
    pub seed: u64,
    pub eve_present: bool,
    pub alice_bits: Vec<bool>,
    pub alice_bases: Vec<Basis>,
    pub bob_bases: Vec<Basis>,
    /// Eve's bases, drawn only when she is present.
    pub eve_bases: Option<Vec<Basis>>,
    pub bob_results: Vec<bool>,
}

impl ProtocolRun {
    pub fn len(&self) -> usize {
        self.alice_bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alice_bits.is_empty()
    }

    pub fn sift(&self) -> Result<SiftedKey, Bb84Error> {
        sift(
            &self.alice_bits,
            &self.alice_bases,
            &self.bob_results,
            &self.bob_bases,
        )
    }
}

/// Runs the protocol with the closed-form simulator.
///
/// # Errors
///
/// See [`run_with`].
pub fn run(config: &RunConfig) -> Result<ProtocolRun, Bb84Error> {
    run_with(config, &ClosedFormSimulator)
}

/// Runs the protocol with the given simulator backend.
///
/// All bits and bases are drawn before the first transmission. For a fixed
/// seed the result is the same with or without the `parallel` feature.
///
/// # Errors
///
/// Returns a `Bb84Error` if:
/// - `num_qubits` is zero or `noise_probability` is outside [0.0, 1.0].
/// - The simulator backend fails on a transmission.
pub fn run_with<S: QubitSimulator>(
    config: &RunConfig,
    simulator: &S,
) -> Result<ProtocolRun, Bb84Error> {
    config.validate()?;
    let n = config.num_qubits;
    let seed = rng::resolve_seed(config.seed);
    debug!(
        n,
        noise = config.noise_probability,
        seed,
        eve = ?config.eve,
        "starting BB84 run"
    );

    let mut master = StdRng::seed_from_u64(seed);

    // The flag is always drawn so that forcing Eve leaves the other draws
    // for a given seed unchanged.
    let coin = master.random_bool(0.5);
    let eve_present = match config.eve {
        EvePolicy::Random => coin,
        EvePolicy::Always => true,
        EvePolicy::Never => false,
    };
    debug!(eve_present, "eve presence decided");

    let alice_bits = random_bits(&mut master, n);
    let alice_bases = random_bases(&mut master, n);
    let bob_bases = random_bases(&mut master, n);
    let eve_bases = eve_present.then(|| random_bases(&mut master, n));
    let channel_key: u64 = master.random();

    let transmissions: Vec<Transmission> = (0..n)
        .map(|i| Transmission {
            alice_bit: alice_bits[i],
            alice_basis: alice_bases[i],
            eve_basis: eve_bases.as_ref().map(|bases| bases[i]),
            bob_basis: bob_bases[i],
        })
        .collect();

    let channel = QubitChannel::new(simulator, config.noise_probability)?
        .with_intercept(config.intercept);
    let bob_results = transmit_all(&channel, &transmissions, channel_key)?;

    Ok(ProtocolRun {
        seed,
        eve_present,
        alice_bits,
        alice_bases,
        bob_bases,
        eve_bases,
        bob_results,
    })
}

#[cfg(not(feature = "parallel"))]
fn transmit_all<S: QubitSimulator>(
    channel: &QubitChannel<'_, S>,
    transmissions: &[Transmission],
    channel_key: u64,
) -> Result<Vec<bool>, Bb84Error> {
    transmissions
        .iter()
        .enumerate()
        .map(|(i, t)| channel.transmit(t, &mut rng::substream(channel_key, i as u64)))
        .collect()
}

#[cfg(feature = "parallel")]
fn transmit_all<S: QubitSimulator>(
    channel: &QubitChannel<'_, S>,
    transmissions: &[Transmission],
    channel_key: u64,
) -> Result<Vec<bool>, Bb84Error> {
    transmissions
        .par_iter()
        .enumerate()
        .map(|(i, t)| channel.transmit(t, &mut rng::substream(channel_key, i as u64)))
        .collect()
}

/// Full pipeline result: raw run, sifted keys and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Bb84Report {
    pub run: ProtocolRun,
    pub key: SiftedKey,
    pub analysis: Analysis,
}

impl Bb84Report {
    pub fn eve_present(&self) -> bool {
        self.run.eve_present
    }

    pub fn raw_length(&self) -> usize {
        self.run.len()
    }

    pub fn sifted_length(&self) -> usize {
        self.key.len()
    }
}

/// Run, sift and analyze with the closed-form simulator.
///
/// An empty sifted key surfaces as [`Bb84Error::EmptyKey`].
pub fn execute(config: &RunConfig) -> Result<Bb84Report, Bb84Error> {
    execute_with(config, &ClosedFormSimulator)
}

/// Run, sift and analyze with the given simulator backend.
///
/// # Errors
///
/// Returns a `Bb84Error` if:
/// - The run fails (see [`run_with`]).
/// - No basis matched, so the sifted key is empty (`Bb84Error::EmptyKey`).
pub fn execute_with<S: QubitSimulator>(
    config: &RunConfig,
    simulator: &S,
) -> Result<Bb84Report, Bb84Error> {
    let run = run_with(config, simulator)?;
    let key = run.sift()?;
    debug!(sifted = key.len(), raw = run.len(), "sifting done");
    if key.is_empty() {
        warn!(seed = run.seed, n = run.len(), "no matching bases, sifted key is empty");
    }
    let analysis = analyze(&key.alice, &key.bob)?;

    Ok(Bb84Report { run, key, analysis })
}

struct Bits<'a>(&'a [bool]);

impl fmt::Display for Bits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, &bit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", u8::from(bit))?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Bb84Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let presence = if self.run.eve_present { "present" } else { "absent" };
        let agreement = self.analysis.agreement_rate * 100.0;
        writeln!(f, "Eve is {presence} in this run.")?;
        writeln!(f)?;
        writeln!(f, "Key Agreement Rate: {agreement:.2}%")?;
        writeln!(f, "Quantum Bit Error Rate (QBER): {:.2}%", self.analysis.qber * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Alice's key: {}", Bits(&self.key.alice))?;
        writeln!(f, "Bob's key:   {}", Bits(&self.key.bob))?;
        writeln!(f, "Key length: {}", self.key.len())?;
        write!(f, "Agreement: {agreement:.2}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterceptStrategy;
    use crate::simulator::DensityMatrixSimulator;

    fn config_for(n: usize, noise: f64, seed: u64, eve: EvePolicy) -> RunConfig {
        RunConfig::new(n, noise).with_seed(seed).with_eve(eve)
    }

    #[test]
    fn lengths_are_aligned() {
        let run = run(&config_for(64, 0.05, 1, EvePolicy::Always)).unwrap();
        assert_eq!(run.len(), 64);
        assert_eq!(run.alice_bases.len(), 64);
        assert_eq!(run.bob_bases.len(), 64);
        assert_eq!(run.bob_results.len(), 64);
        assert_eq!(run.eve_bases.as_ref().map(Vec::len), Some(64));
    }

    #[test]
    fn eve_bases_absent_without_eve() {
        let run = run(&config_for(16, 0.0, 2, EvePolicy::Never)).unwrap();
        assert!(!run.eve_present);
        assert!(run.eve_bases.is_none());
    }

    #[test]
    fn zero_qubits_is_a_configuration_error() {
        assert!(matches!(
            run(&RunConfig::new(0, 0.0)),
            Err(Bb84Error::Configuration(_))
        ));
    }

    #[test]
    fn forcing_eve_keeps_party_draws() {
        let with = run(&config_for(32, 0.0, 9, EvePolicy::Always)).unwrap();
        let without = run(&config_for(32, 0.0, 9, EvePolicy::Never)).unwrap();
        assert_eq!(with.alice_bits, without.alice_bits);
        assert_eq!(with.alice_bases, without.alice_bases);
        assert_eq!(with.bob_bases, without.bob_bases);
    }

    #[test]
    fn ideal_channel_agrees_on_sifted_bits() {
        for seed in 0..20 {
            let report = execute(&config_for(50, 0.0, seed, EvePolicy::Never)).unwrap();
            assert_eq!(report.key.alice, report.key.bob);
            assert_eq!(report.analysis.qber, 0.0);
        }
    }

    #[test]
    fn density_backend_reproduces_ideal_channel() {
        let config = config_for(80, 0.0, 4, EvePolicy::Never);
        let report = execute_with(&config, &DensityMatrixSimulator).unwrap();
        assert_eq!(report.key.alice, report.key.bob);
    }

    #[test]
    fn measure_resend_eve_is_detected() {
        let config = config_for(2000, 0.0, 5, EvePolicy::Always)
            .with_intercept(InterceptStrategy::MeasureResend);
        let report = execute(&config).unwrap();
        assert!((report.analysis.qber - 0.25).abs() < 0.05);
    }

    #[test]
    fn report_prints_like_the_console_summary() {
        let report = execute(&config_for(20, 0.0, 6, EvePolicy::Never)).unwrap();
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Eve is absent in this run.");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Key Agreement Rate: 100.00%");
        assert_eq!(lines[3], "Quantum Bit Error Rate (QBER): 0.00%");
        assert_eq!(lines[4], "");
        assert!(lines[5].starts_with("Alice's key: ["));
        assert!(lines[6].starts_with("Bob's key:   ["));
        assert_eq!(lines[7], format!("Key length: {}", report.sifted_length()));
        assert_eq!(lines[8], "Agreement: 100.00%");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn fixed_seed_outcome_is_pinned() {
        // Must hold for both the sequential and the `parallel` build.
        const EXPECTED: &str = "1010111100010101101010000011111101101111100010100101000001100000";
        let run = run(&RunConfig::new(64, 0.3).with_seed(5).with_eve(EvePolicy::Always)).unwrap();
        let expected: Vec<bool> = EXPECTED.chars().map(|c| c == '1').collect();
        assert!(run.eve_present);
        assert_eq!(run.seed, 5);
        assert_eq!(run.bob_results, expected);
    }
}
