//! BB84 Quantum Key Distribution.
//!
//! - **channel**: one qubit's path from Alice to Bob, with optional noise or
//!   interception.
//! - **bb84**: the protocol run and the run → sift → analyze pipeline.
//! - **sifting**: basis reconciliation.
//! - **analysis**: agreement rate and QBER.

pub mod analysis;
pub mod bb84;
pub mod channel;
pub mod sifting;
