//! BB84 quantum key distribution simulation.
//!
//! Simulates Alice sending random bits in random bases to Bob over a channel
//! that is either noisy or intercepted by Eve, sifts the shared key and
//! estimates its quantum bit error rate.

pub mod config;
mod core;
pub mod protocols;
pub mod rng;
mod sampler;
pub mod simulator;

pub use crate::config::{EvePolicy, InterceptStrategy, RunConfig};
pub use crate::core::{
    Basis, EncodedQubit, Gate, Measurement, MeasurementResult, QubitState, errors, utils,
};
pub use crate::protocols::qkd::analysis::{Analysis, QBER_ABORT_THRESHOLD, analyze};
pub use crate::protocols::qkd::bb84::{
    Bb84Report, ProtocolRun, execute, execute_with, run, run_with,
};
pub use crate::protocols::qkd::channel::{QubitChannel, Transmission};
pub use crate::protocols::qkd::sifting::{SiftedKey, sift};
pub use crate::sampler::{SampleSummary, Sampler};
pub use crate::simulator::{ClosedFormSimulator, DensityMatrixSimulator, QubitSimulator};
