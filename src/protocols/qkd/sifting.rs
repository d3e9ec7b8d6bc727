//! Basis reconciliation: keep the positions where Alice and Bob measured in
//! the same basis.

use crate::core::Basis;
use crate::core::errors::Bb84Error;

/// Sifted key pair. Both keys have the same length and keep the original
/// index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiftedKey {
    pub alice: Vec<bool>,
    pub bob: Vec<bool>,
    /// Raw positions the sifted bits came from.
    pub indices: Vec<usize>,
}

impl SiftedKey {
    pub fn len(&self) -> usize {
        self.alice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alice.is_empty()
    }
}

/// Extracts the matching-basis subsequence of both parties' bits.
///
/// All four inputs must have the same length.
pub fn sift(
    alice_bits: &[bool],
    alice_bases: &[Basis],
    bob_bits: &[bool],
    bob_bases: &[Basis],
) -> Result<SiftedKey, Bb84Error> {
    let expected = alice_bits.len();
    for found in [alice_bases.len(), bob_bits.len(), bob_bases.len()] {
        if found != expected {
            return Err(Bb84Error::ShapeMismatch {
                stage: "sifting",
                expected,
                found,
            });
        }
    }

    let mut key = SiftedKey::default();
    for (i, (a_basis, b_basis)) in alice_bases.iter().zip(bob_bases).enumerate() {
        if a_basis == b_basis {
            key.alice.push(alice_bits[i]);
            key.bob.push(bob_bits[i]);
            key.indices.push(i);
        }
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Basis::{Diagonal as D, Rectilinear as R};

    #[test]
    fn keeps_matching_positions_in_order() {
        let key = sift(
            &[true, false, true, true, false],
            &[R, D, D, R, R],
            &[true, true, false, true, true],
            &[R, R, D, D, R],
        )
        .unwrap();
        assert_eq!(key.indices, vec![0, 2, 4]);
        assert_eq!(key.alice, vec![true, true, false]);
        assert_eq!(key.bob, vec![true, false, true]);
    }

    #[test]
    fn all_mismatched_gives_empty_key() {
        let key = sift(&[true], &[R], &[false], &[D]).unwrap();
        assert!(key.is_empty());
    }

    #[test]
    fn unequal_lengths_are_rejected() {
        let err = sift(&[true; 5], &[R; 5], &[true; 4], &[R; 5]).unwrap_err();
        assert_eq!(
            err,
            Bb84Error::ShapeMismatch {
                stage: "sifting",
                expected: 5,
                found: 4
            }
        );
        assert!(sift(&[true; 5], &[R; 5], &[true; 5], &[R; 6]).is_err());
    }
}
