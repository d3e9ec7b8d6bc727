use num_complex::Complex64;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Bb84Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Shape mismatch in {stage}: expected length {expected}, found {found}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Sifted key is empty: no basis matches between Alice and Bob")]
    EmptyKey,

    #[error("Simulator error: {0}")]
    Simulator(#[from] StateError),
}

impl Bb84Error {
    /// True for the recoverable "run produced no key" outcome.
    pub fn is_empty_key(&self) -> bool {
        matches!(self, Bb84Error::EmptyKey)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("Matrix is not Unitary (U†U != I)")]
    NonUnitary,

    #[error("Single-qubit gates must be 2x2, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    #[error("Measurement operators do not sum to Identity (Completeness relation failed)")]
    NotComplete,

    #[error("Invalid operator dimensions")]
    InvalidDimensions,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("Trace is not unity: {0}")]
    InvalidTrace(Complex64),

    #[error("Outcome with vanishing probability selected")]
    ZeroProbabilityOutcome,

    #[error("Measurement error: {0}")]
    MeasurementError(#[from] MeasurementError),

    #[error("Gate error: {0}")]
    GateError(#[from] GateError),
}
