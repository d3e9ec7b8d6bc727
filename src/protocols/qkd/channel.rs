//! Lifecycle of one BB84 qubit: Alice prepares, Eve optionally intercepts,
//! the channel optionally flips it, Bob measures.

use crate::config::{InterceptStrategy, validate_prob};
use crate::core::errors::Bb84Error;
use crate::core::{Basis, EncodedQubit};
use crate::simulator::QubitSimulator;
use rand::Rng;
use tracing::trace;

/// Per-index inputs of one transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transmission {
    pub alice_bit: bool,
    pub alice_basis: Basis,
    /// Eve's basis, `None` when she is absent from the run.
    pub eve_basis: Option<Basis>,
    pub bob_basis: Basis,
}

pub struct QubitChannel<'a, S> {
    simulator: &'a S,
    noise_probability: f64,
    intercept: InterceptStrategy,
}

impl<'a, S: QubitSimulator> QubitChannel<'a, S> {
    /// Creates a channel backed by `simulator`.
    ///
    /// # Errors
    ///
    /// Returns `Bb84Error::Configuration` if `noise_probability` is not within
    /// [0.0, 1.0].
    pub fn new(simulator: &'a S, noise_probability: f64) -> Result<Self, Bb84Error> {
        validate_prob(noise_probability)?;
        Ok(Self {
            simulator,
            noise_probability,
            intercept: InterceptStrategy::default(),
        })
    }

    pub fn with_intercept(mut self, intercept: InterceptStrategy) -> Self {
        self.intercept = intercept;
        self
    }

    pub fn noise_probability(&self) -> f64 {
        self.noise_probability
    }

    /// Sends one qubit and returns Bob's measured bit.
    ///
    /// Without Eve the qubit suffers a bit flip in its encoding basis with
    /// probability `noise_probability`. With Eve it is measured in her basis,
    /// destroyed, and re-prepared in her basis with the bit chosen by the
    /// intercept strategy.
    ///
    /// # Errors
    ///
    /// Returns `Bb84Error::Simulator` if the simulator backend fails.
    pub fn transmit<R: Rng + ?Sized>(
        &self,
        transmission: &Transmission,
        rng: &mut R,
    ) -> Result<bool, Bb84Error> {
        let mut qubit = EncodedQubit::new(transmission.alice_bit, transmission.alice_basis);

        match transmission.eve_basis {
            None => {
                let flipped = rng.random_bool(self.noise_probability);
                if flipped {
                    qubit = qubit.flipped();
                }
                trace!(flipped, basis = ?qubit.basis, "qubit crossed channel");
            }
            Some(eve_basis) => {
                let eve_bit = self.simulator.measure(qubit, eve_basis, rng)?;
                let forwarded = match self.intercept {
                    InterceptStrategy::RandomResend => rng.random_bool(0.5),
                    InterceptStrategy::MeasureResend => eve_bit,
                };
                trace!(eve_bit, forwarded, ?eve_basis, "eve intercepted qubit");
                qubit = EncodedQubit::new(forwarded, eve_basis);
            }
        }

        let bob_bit = self
            .simulator
            .measure(qubit, transmission.bob_basis, rng)?;
        Ok(bob_bit)
    }
}
