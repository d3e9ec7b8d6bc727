//! Quantum Cryptography Protocols.

pub mod qkd;
pub use qkd::{analysis, bb84, channel, sifting};
