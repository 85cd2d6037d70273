//! Ciphertexts for the ACES encryption scheme.

use crate::parameters::AcesParameters;
use aces_math::ru::Poly;
use std::sync::Arc;

/// A ciphertext encrypting a value of Z_p.
///
/// The vector `c` interacts with the secret key through a scalar product
/// during decryption, while `c'` conceals the message. The field `uplvl` is a
/// public upper bound on the level of noise accumulated by the ciphertext,
/// counted in multiples of p: decryption is guaranteed to be exact while
/// `uplvl < q / p`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ciphertext {
    pub(crate) par: Arc<AcesParameters>,
    pub(crate) c: Box<[Poly]>,
    pub(crate) c_prime: Poly,
    pub(crate) uplvl: u128,
}

impl Ciphertext {
    /// Returns the public upper bound on the noise level of this ciphertext.
    pub const fn uplvl(&self) -> u128 {
        self.uplvl
    }

    /// Returns whether decryption of this ciphertext is no longer guaranteed
    /// to be exact.
    pub fn is_saturated(&self) -> bool {
        self.par.is_saturating(self.uplvl)
    }

    /// Returns the parameters of the channel this ciphertext belongs to.
    pub const fn parameters(&self) -> &Arc<AcesParameters> {
        &self.par
    }
}
