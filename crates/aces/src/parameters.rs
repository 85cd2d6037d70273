//! Create parameters for the ACES encryption scheme.

use crate::errors::{Error, ParametersError, Result};
use aces_util::{gcd, is_prime, is_prime_power};
use std::sync::Arc;

/// How far above a prime cipher modulus the builder searches for a composite
/// replacement.
const COMPOSITE_SEARCH_SPAN: u64 = 1 << 16;

/// Parameters for the ACES encryption scheme.
///
/// The plaintext space is Z_p and ciphertext arithmetic happens in Z_q, with
/// p^2 < q, gcd(p, q) = 1, and q composite. The degree n is the degree of the
/// reduction polynomial u, and the width N is the number of columns of the
/// initializer matrix f0.
#[derive(Debug, Clone, PartialEq)]
pub struct AcesParameters {
    plaintext_modulus: u64,
    cipher_modulus: u64,
    degree: usize,
    width: usize,
    zero_noise_probability: f64,
}

impl aces_traits::AcesParameters for AcesParameters {}

impl AcesParameters {
    /// Returns the plaintext modulus p, also called the vanishing modulus.
    pub const fn plaintext(&self) -> u64 {
        self.plaintext_modulus
    }

    /// Returns the cipher modulus q, also called the integer modulus.
    pub const fn cipher_modulus(&self) -> u64 {
        self.cipher_modulus
    }

    /// Returns the degree n of the reduction polynomial.
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the ciphertext width N.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the probability of drawing a noiseless vanisher during key
    /// generation.
    pub const fn zero_noise_probability(&self) -> f64 {
        self.zero_noise_probability
    }

    /// Returns whether a ciphertext with the given level bound is saturated,
    /// i.e. whether its decryption is no longer guaranteed to be exact.
    ///
    /// Decryption recovers m exactly whenever uplvl < q / p, since the
    /// decrypted evaluation is then m + p * l < q for some l <= uplvl.
    pub fn is_saturating(&self, uplvl: u128) -> bool {
        uplvl.saturating_mul(self.plaintext_modulus as u128) >= self.cipher_modulus as u128
    }
}

/// A builder for [`AcesParameters`].
///
/// ```
/// use aces::AcesParametersBuilder;
/// let params = AcesParametersBuilder::new()
///     .set_plaintext_modulus(32)
///     .set_cipher_modulus(33554433)
///     .set_degree(10)
///     .set_width(2)
///     .build()
///     .unwrap();
/// assert_eq!(params.cipher_modulus(), 33554433);
/// ```
#[derive(Debug, Default)]
pub struct AcesParametersBuilder {
    plaintext_modulus: u64,
    cipher_modulus: u64,
    degree: usize,
    width: usize,
    zero_noise_probability: Option<f64>,
}

impl AcesParametersBuilder {
    /// Creates a new instance of the builder.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            plaintext_modulus: Default::default(),
            cipher_modulus: Default::default(),
            degree: Default::default(),
            width: Default::default(),
            zero_noise_probability: None,
        }
    }

    /// Sets the plaintext modulus p.
    pub fn set_plaintext_modulus(&mut self, p: u64) -> &mut Self {
        self.plaintext_modulus = p;
        self
    }

    /// Sets the cipher modulus q. A prime value is replaced with a nearby
    /// composite at build time, and the replacement is logged.
    pub fn set_cipher_modulus(&mut self, q: u64) -> &mut Self {
        self.cipher_modulus = q;
        self
    }

    /// Sets the degree n of the reduction polynomial.
    pub fn set_degree(&mut self, degree: usize) -> &mut Self {
        self.degree = degree;
        self
    }

    /// Sets the ciphertext width N.
    pub fn set_width(&mut self, width: usize) -> &mut Self {
        self.width = width;
        self
    }

    /// Sets the probability of drawing a noiseless vanisher during key
    /// generation. Defaults to 1 / (p + 1).
    pub fn set_zero_noise_probability(&mut self, probability: f64) -> &mut Self {
        self.zero_noise_probability = Some(probability);
        self
    }

    /// Build a new [`AcesParameters`] wrapped in an `Arc`.
    pub fn build_arc(&self) -> Result<Arc<AcesParameters>> {
        self.build().map(Arc::new)
    }

    /// Build a new [`AcesParameters`].
    pub fn build(&self) -> Result<AcesParameters> {
        let p = self.plaintext_modulus;
        if p < 2 {
            return Err(Error::ParametersError(
                ParametersError::InvalidPlaintextModulus(p),
            ));
        }
        if self.degree <= 4 {
            return Err(Error::ParametersError(ParametersError::InvalidDegree(
                self.degree,
            )));
        }
        if self.width < 1 {
            return Err(Error::ParametersError(ParametersError::InvalidWidth(
                self.width,
            )));
        }

        let mut q = self.cipher_modulus;
        if q == 0 {
            return Err(Error::ParametersError(ParametersError::TooFewSpecified(
                "no cipher modulus specified".to_string(),
            )));
        }
        if (q >> 62) != 0 {
            return Err(Error::ParametersError(
                ParametersError::CipherModulusTooLarge(q),
            ));
        }
        if (p as u128) * (p as u128) >= q as u128 {
            return Err(Error::ParametersError(
                ParametersError::CipherModulusTooSmall(q, p.saturating_mul(p)),
            ));
        }

        if is_prime(q) {
            q = Self::nearby_composite(p, q).ok_or(Error::ParametersError(
                ParametersError::NoCompositeModulus(q),
            ))?;
            log::warn!(
                "cipher modulus {} is prime and was replaced with the composite {q}",
                self.cipher_modulus
            );
        }

        if gcd(p, q) != 1 {
            return Err(Error::ParametersError(ParametersError::ModuliNotCoprime(
                p, q,
            )));
        }
        if is_prime_power(q) {
            return Err(Error::ParametersError(
                ParametersError::CipherModulusPrimePower(q),
            ));
        }

        let zero_noise_probability = self
            .zero_noise_probability
            .unwrap_or(1.0 / (p as f64 + 1.0));
        if !(0.0..=1.0).contains(&zero_noise_probability) {
            return Err(Error::ParametersError(ParametersError::InvalidProbability(
                zero_noise_probability,
            )));
        }

        Ok(AcesParameters {
            plaintext_modulus: p,
            cipher_modulus: q,
            degree: self.degree,
            width: self.width,
            zero_noise_probability,
        })
    }

    /// Finds the first integer above `q` that is composite, has at least two
    /// distinct prime factors, is coprime with p, and still dominates p^2.
    fn nearby_composite(p: u64, q: u64) -> Option<u64> {
        (q + 1..q.checked_add(COMPOSITE_SEARCH_SPAN)?).find(|candidate| {
            (candidate >> 62) == 0
                && gcd(p, *candidate) == 1
                && !is_prime(*candidate)
                && !is_prime_power(*candidate)
        })
    }
}
