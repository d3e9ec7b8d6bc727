//! Classical description of BB84 qubits.
//!
//! A BB84 qubit only ever lives in one of the two mutually unbiased bases, so
//! the pair (bit, basis) describes it completely until it is measured.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Encoding / measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Z basis {|0>, |1>}.
    Rectilinear,
    /// X basis {|+>, |->}.
    Diagonal,
}

impl Basis {
    /// Draws a basis uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Basis::Diagonal
        } else {
            Basis::Rectilinear
        }
    }
}

/// A qubit prepared by encoding `bit` in `basis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedQubit {
    pub bit: bool,
    pub basis: Basis,
}

impl EncodedQubit {
    pub fn new(bit: bool, basis: Basis) -> Self {
        Self { bit, basis }
    }

    /// Bit-flip in the encoding basis. The basis is unchanged.
    pub fn flipped(self) -> Self {
        Self {
            bit: !self.bit,
            basis: self.basis,
        }
    }
}

/// `n` independent uniform bits.
pub fn random_bits<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<bool> {
    (0..n).map(|_| rng.random_bool(0.5)).collect()
}

/// `n` independent uniform bases.
pub fn random_bases<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Basis> {
    (0..n).map(|_| Basis::random(&mut *rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn flip_keeps_basis() {
        let q = EncodedQubit::new(true, Basis::Diagonal).flipped();
        assert!(!q.bit);
        assert_eq!(q.basis, Basis::Diagonal);
    }

    #[test]
    fn generators_are_seed_deterministic() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(random_bits(&mut a, 64), random_bits(&mut b, 64));
        assert_eq!(random_bases(&mut a, 64), random_bases(&mut b, 64));
    }

    #[test]
    fn generators_hit_both_values() {
        let mut rng = StdRng::seed_from_u64(11);
        let bases = random_bases(&mut rng, 200);
        assert!(bases.contains(&Basis::Rectilinear));
        assert!(bases.contains(&Basis::Diagonal));
        let bits = random_bits(&mut rng, 200);
        assert!(bits.iter().any(|&b| b));
        assert!(bits.iter().any(|&b| !b));
    }
}
