//! Key agreement statistics over a sifted key pair.

use crate::core::errors::Bb84Error;
use serde::{Deserialize, Serialize};

/// Conventional BB84 abort threshold on the QBER.
pub const QBER_ABORT_THRESHOLD: f64 = 0.11;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Sifted key length.
    pub length: usize,
    pub matches: usize,
    pub errors: usize,
    pub agreement_rate: f64,
    /// Quantum bit error rate, `1 - agreement_rate`.
    pub qber: f64,
}

impl Analysis {
    /// Asymptotic secret fraction `max(0, 1 - 2 H2(qber))` of the sifted key.
    pub fn secure_fraction(&self) -> f64 {
        (1.0 - 2.0 * binary_entropy(self.qber)).max(0.0)
    }

    pub fn exceeds_threshold(&self, threshold: f64) -> bool {
        self.qber > threshold
    }
}

/// Compares the two sifted keys position by position.
pub fn analyze(alice_key: &[bool], bob_key: &[bool]) -> Result<Analysis, Bb84Error> {
    if alice_key.len() != bob_key.len() {
        return Err(Bb84Error::ShapeMismatch {
            stage: "analysis",
            expected: alice_key.len(),
            found: bob_key.len(),
        });
    }

    let length = alice_key.len();
    if length == 0 {
        return Err(Bb84Error::EmptyKey);
    }

    let matches = alice_key
        .iter()
        .zip(bob_key)
        .filter(|(a, b)| a == b)
        .count();
    let agreement_rate = matches as f64 / length as f64;

    Ok(Analysis {
        length,
        matches,
        errors: length - matches,
        agreement_rate,
        qber: 1.0 - agreement_rate,
    })
}

/// Binary entropy H2(p) in bits.
pub fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        0.0
    } else {
        -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
    }
}
