//! Single-qubit simulator backends.
//!
//! The protocol only ever prepares a qubit in one of the two BB84 bases and
//! measures it in one of them, so a simulator is a map from
//! (prepared qubit, measurement basis) to one classical bit.

use crate::core::errors::StateError;
use crate::core::{Basis, EncodedQubit, Measurement, QubitState};
use rand::Rng;

/// Measures a prepared qubit in a basis, consuming it.
pub trait QubitSimulator: Send + Sync {
    fn measure<R: Rng + ?Sized>(
        &self,
        qubit: EncodedQubit,
        basis: Basis,
        rng: &mut R,
    ) -> Result<bool, StateError>;
}

/// Closed-form rule: a matching basis returns the encoded bit, a mismatched
/// basis returns a uniform bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedFormSimulator;

impl QubitSimulator for ClosedFormSimulator {
    fn measure<R: Rng + ?Sized>(
        &self,
        qubit: EncodedQubit,
        basis: Basis,
        rng: &mut R,
    ) -> Result<bool, StateError> {
        if qubit.basis == basis {
            Ok(qubit.bit)
        } else {
            Ok(rng.random_bool(0.5))
        }
    }
}

/// Density-matrix backend: prepares the state with X/H gates and measures it
/// with basis projectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityMatrixSimulator;

impl QubitSimulator for DensityMatrixSimulator {
    fn measure<R: Rng + ?Sized>(
        &self,
        qubit: EncodedQubit,
        basis: Basis,
        rng: &mut R,
    ) -> Result<bool, StateError> {
        let mut state = QubitState::prepare(qubit);
        let result = state.measure(&Measurement::in_basis(basis), rng)?;
        Ok(result.bit())
    }
}
