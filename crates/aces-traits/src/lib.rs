#![crate_name = "aces_traits"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Traits for the aces.rs homomorphic encryption library.

use rand::{CryptoRng, RngCore};

/// The parameters of an encryption channel.
pub trait AcesParameters {}

/// Indicates that an object is parametrized.
pub trait Parametrized {
    /// The type of the parameters.
    type Parameters: AcesParameters;
}

/// Encrypts plaintext values into ciphertexts of type `C`, producing the
/// associated secret level material of type `L` alongside.
pub trait AcesEncrypter<C, L>: Parametrized {
    /// The type of error returned.
    type Error;

    /// Attempt to encrypt the value `m`, drawing randomness from `rng`.
    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        m: u64,
        rng: &mut R,
    ) -> Result<(C, L), Self::Error>;
}

/// Decrypts ciphertexts of type `C`.
pub trait AcesDecrypter<C>: Parametrized {
    /// The type of error returned.
    type Error;

    /// The type of the decryption output.
    type Plaintext;

    /// Attempt to decrypt the ciphertext `ct`.
    fn try_decrypt(&self, ct: &C) -> Result<Self::Plaintext, Self::Error>;
}

/// A value domain over which compiled circuits can be evaluated.
///
/// The capability set is deliberately small: two binary operations. The same
/// compiled circuit can then run over plaintexts, ciphertexts, or level
/// vectors, whichever domain is provided.
pub trait CircuitDomain {
    /// The values manipulated by the domain.
    type Value: Clone;

    /// The type of error returned by the operations.
    type Error;

    /// Adds two values of the domain.
    fn add(&self, a: &Self::Value, b: &Self::Value) -> Result<Self::Value, Self::Error>;

    /// Multiplies two values of the domain.
    fn mul(&self, a: &Self::Value, b: &Self::Value) -> Result<Self::Value, Self::Error>;
}
