//! Parallel level tracking for refresh operations.

use crate::errors::{Error, Result};
use crate::keys::AcesPublicKey;
use crate::level::{self, LevelVec};
use crate::parameters::AcesParameters;
use aces_traits::CircuitDomain;
use std::sync::Arc;

/// Tracks ciphertext levels in parallel with a homomorphic evaluation.
///
/// The party performing the computation keeps the level vector returned by
/// each encryption, evaluates the same circuit over those vectors through the
/// level sub-algebra, and processes the result into the scalar consumed by
/// [`crate::AcesAlgebra::refresh`].
pub struct Refresher {
    par: Arc<AcesParameters>,
    lvl_e: Box<[u64]>,
}

impl Refresher {
    /// Creates a refresher from the published portion of a channel.
    pub fn new(pk: &Arc<AcesPublicKey>) -> Self {
        Self {
            par: pk.parameters().clone(),
            lvl_e: pk.vanisher_levels().to_vec().into_boxed_slice(),
        }
    }

    /// The scalar level of a vector: its dot product with the published
    /// vanisher levels. For a fresh encryption this is the exact noise of the
    /// ciphertext; through the level sub-algebra it remains a lower bound.
    pub fn level(&self, k: &LevelVec) -> u128 {
        level::scalar_level(&self.lvl_e, k)
    }

    /// Converts per-ciphertext level vectors into the scalar inputs consumed
    /// by [`crate::AcesAlgebra::refresh`].
    pub fn process(&self, levels: &[LevelVec]) -> Vec<u128> {
        levels.iter().map(|k| self.level(k)).collect()
    }
}

impl CircuitDomain for Refresher {
    type Value = LevelVec;
    type Error = Error;

    fn add(&self, a: &LevelVec, b: &LevelVec) -> Result<LevelVec> {
        Ok(level::add_levels(a, b))
    }

    fn mul(&self, a: &LevelVec, b: &LevelVec) -> Result<LevelVec> {
        Ok(level::mul_levels(self.par.plaintext(), &self.lvl_e, a, b))
    }
}
