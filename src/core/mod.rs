pub mod errors;
mod gates;
mod measurements;
pub mod qubit;
mod state;
pub mod utils;

pub use gates::Gate;
pub use measurements::{Measurement, MeasurementResult};
pub use qubit::{Basis, EncodedQubit};
pub use state::QubitState;
