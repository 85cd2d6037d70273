//! Secret level vectors tracked alongside ciphertexts.

use itertools::izip;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The per-component level vector of a ciphertext.
///
/// Entry i counts how many times the vanisher e'_i of the channel has
/// contributed to the ciphertext noise; the scalar level of the ciphertext is
/// the dot product of this vector with the published `lvl_e`. Level vectors
/// are known only to the party performing the homomorphic computation and are
/// zeroized on destruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelVec {
    pub(crate) k: Box<[u128]>,
}

impl Zeroize for LevelVec {
    fn zeroize(&mut self) {
        self.k.zeroize();
    }
}

impl ZeroizeOnDrop for LevelVec {}

impl LevelVec {
    /// Creates a level vector from its entries.
    pub fn new(k: Vec<u128>) -> Self {
        Self {
            k: k.into_boxed_slice(),
        }
    }

    /// Creates the zero level vector of the given width. This is the tracker
    /// of a freshly refreshed ciphertext, whose residual noise is no longer
    /// accounted for.
    pub fn zero(width: usize) -> Self {
        Self {
            k: vec![0u128; width].into_boxed_slice(),
        }
    }

    /// Returns the entries of the level vector.
    pub fn entries(&self) -> &[u128] {
        &self.k
    }

    /// Returns the width of the level vector.
    pub fn len(&self) -> usize {
        self.k.len()
    }

    /// Returns whether the level vector is empty.
    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }
}

/// Component-wise addition of level vectors; the scalar level of the result
/// is the sum of the input levels.
pub(crate) fn add_levels(k1: &LevelVec, k2: &LevelVec) -> LevelVec {
    assert_eq!(k1.len(), k2.len(), "Incompatible level widths");
    LevelVec::new(
        izip!(k1.k.iter(), k2.k.iter())
            .map(|(a, b)| a.saturating_add(*b))
            .collect(),
    )
}

/// The scalar level of a vector: its dot product with the published vanisher
/// levels.
pub(crate) fn scalar_level(lvl_e: &[u64], k: &LevelVec) -> u128 {
    assert_eq!(k.len(), lvl_e.len(), "Incompatible level widths");
    izip!(k.k.iter(), lvl_e.iter()).fold(0u128, |acc, (ki, di)| {
        acc.saturating_add(ki.saturating_mul(*di as u128))
    })
}

/// The tensor product of two level vectors contracted through the vanisher
/// levels and scaled by p: the scalar level of the result is
/// p * l(k1) * l(k2), which never exceeds the true noise of the product of
/// two ciphertexts with true noises at least l(k1) and l(k2).
pub(crate) fn mul_levels(p: u64, lvl_e: &[u64], k1: &LevelVec, k2: &LevelVec) -> LevelVec {
    let scale = (p as u128).saturating_mul(scalar_level(lvl_e, k2));
    LevelVec::new(
        k1.k.iter()
            .map(|ki| ki.saturating_mul(scale))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::{add_levels, mul_levels, scalar_level, LevelVec};
    use zeroize::Zeroize;

    #[test]
    fn level_arithmetic() {
        let lvl_e = [1u64, 0, 1];
        let k1 = LevelVec::new(vec![2, 5, 1]);
        let k2 = LevelVec::new(vec![1, 0, 4]);

        assert_eq!(scalar_level(&lvl_e, &k1), 3);
        assert_eq!(scalar_level(&lvl_e, &k2), 5);

        let sum = add_levels(&k1, &k2);
        assert_eq!(sum.entries(), &[3, 5, 5]);
        assert_eq!(scalar_level(&lvl_e, &sum), 8);

        // l(multlvl(k1, k2)) = p * l(k1) * l(k2).
        let p = 4;
        let product = mul_levels(p, &lvl_e, &k1, &k2);
        assert_eq!(scalar_level(&lvl_e, &product), 4 * 3 * 5);
    }

    #[test]
    fn zeroizes() {
        let mut k = LevelVec::new(vec![3, 1, 4]);
        k.zeroize();
        assert_eq!(k.entries(), &[0, 0, 0]);
    }
}
