//! Homomorphic operations over ACES ciphertexts.

use crate::ciphertext::Ciphertext;
use crate::errors::{Error, Result};
use crate::keys::AcesPublicKey;
use crate::level::{self, LevelVec};
use aces_math::ru::Poly;
use aces_traits::CircuitDomain;
use itertools::izip;
use std::sync::Arc;

/// The homomorphic algebra of an arithmetic channel.
///
/// Built from the published portion of a channel, it combines ciphertexts by
/// addition and by multiplication through the 3-tensor, refreshes a
/// ciphertext from a level tracked in parallel, and carries the matching
/// level sub-algebra ([`AcesAlgebra::addlvl`], [`AcesAlgebra::multlvl`]).
pub struct AcesAlgebra {
    pk: Arc<AcesPublicKey>,
}

impl AcesAlgebra {
    /// Creates the algebra of the given channel.
    pub fn new(pk: &Arc<AcesPublicKey>) -> Self {
        Self { pk: pk.clone() }
    }

    /// Homomorphic addition: component-wise sums, with level bounds added.
    ///
    /// Panics if the operands belong to different channels.
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
        assert_eq!(a.par, b.par, "Incompatible channel parameters");
        assert_eq!(a.par, *self.pk.parameters(), "Incompatible channel parameters");

        let c = izip!(a.c.iter(), b.c.iter())
            .map(|(ai, bi)| ai + bi)
            .collect::<Vec<_>>();
        Ciphertext {
            par: a.par.clone(),
            c: c.into_boxed_slice(),
            c_prime: &a.c_prime + &b.c_prime,
            uplvl: a.uplvl.saturating_add(b.uplvl),
        }
    }

    /// Homomorphic multiplication through the 3-tensor.
    ///
    /// Writing t_ij = c1_i c2_j, the output is
    /// c3_k = c1' c2_k + c2' c1_k - sum_ij lambda\[i\]\[j\]\[k\] t_ij and
    /// c3' = c1' c2' + sum_ij lambda\[i\]\[j\]\[0\] t_ij, so that
    /// c3' - c3^T x = (c1' - c1^T x)(c2' - c2^T x) in Z_q\[X\]/(u). The level
    /// bound becomes p * u1 * u2.
    ///
    /// Panics if the operands belong to different channels.
    pub fn mult(&self, a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
        assert_eq!(a.par, b.par, "Incompatible channel parameters");
        assert_eq!(a.par, *self.pk.parameters(), "Incompatible channel parameters");

        let n = a.par.degree();
        let p = a.par.plaintext();
        let ctx = self.pk.context();
        let tensor = self.pk.tensor();

        // Contract the tensor against the pairwise products of the
        // decomposition vectors; slot 0 collects the constant corrections.
        let mut lin = (0..=n).map(|_| Poly::zero(ctx)).collect::<Vec<_>>();
        for i in 0..n {
            for j in 0..n {
                let t_ij = &a.c[i] * &b.c[j];
                for (k, lin_k) in lin.iter_mut().enumerate() {
                    let l = tensor[[i, j, k]];
                    if l != 0 {
                        *lin_k += &(&t_ij * l);
                    }
                }
            }
        }

        let c = (0..n)
            .map(|k| {
                let mut ck = &(&a.c[k] * &b.c_prime) + &(&b.c[k] * &a.c_prime);
                ck -= &lin[k + 1];
                ck
            })
            .collect::<Vec<_>>();
        let mut c_prime = &a.c_prime * &b.c_prime;
        c_prime += &lin[0];

        Ciphertext {
            par: a.par.clone(),
            c: c.into_boxed_slice(),
            c_prime,
            uplvl: a
                .uplvl
                .saturating_mul(b.uplvl)
                .saturating_mul(p as u128),
        }
    }

    /// Refreshes a ciphertext from the scalar level tracked in parallel by
    /// the refresher: the constant polynomial p * level is stripped from c',
    /// and the level bound drops by `level`.
    ///
    /// The tracked level never exceeds the noise actually accumulated by the
    /// ciphertext, so the subtraction cannot wrap the decrypted evaluation.
    /// The operation fails when the level is zero (the bound would not
    /// decrease), exceeds the public bound of the ciphertext, or cannot be
    /// represented below q.
    pub fn refresh(&self, ct: &Ciphertext, level: u128) -> Result<Ciphertext> {
        if level == 0 {
            return Err(Error::RefreshError(
                "the tracked level is zero, there is nothing to strip".to_string(),
            ));
        }
        if level > ct.uplvl {
            return Err(Error::RefreshError(format!(
                "the tracked level {level} exceeds the ciphertext bound {}",
                ct.uplvl
            )));
        }
        let p = ct.par.plaintext() as u128;
        let q = ct.par.cipher_modulus() as u128;
        let correction = p
            .checked_mul(level)
            .filter(|c| *c < q)
            .ok_or_else(|| {
                Error::RefreshError(format!(
                    "no affine decomposition: p * {level} is not representable below q"
                ))
            })?;

        let c_prime = &ct.c_prime - &Poly::constant(self.pk.context(), correction as u64);
        Ok(Ciphertext {
            par: ct.par.clone(),
            c: ct.c.clone(),
            c_prime,
            uplvl: ct.uplvl - level,
        })
    }

    /// The level counterpart of [`AcesAlgebra::add`].
    pub fn addlvl(&self, k1: &LevelVec, k2: &LevelVec) -> LevelVec {
        level::add_levels(k1, k2)
    }

    /// The level counterpart of [`AcesAlgebra::mult`].
    pub fn multlvl(&self, k1: &LevelVec, k2: &LevelVec) -> LevelVec {
        level::mul_levels(
            self.pk.parameters().plaintext(),
            self.pk.vanisher_levels(),
            k1,
            k2,
        )
    }
}

impl CircuitDomain for AcesAlgebra {
    type Value = Ciphertext;
    type Error = Error;

    fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        Ok(self.add(a, b))
    }

    fn mul(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        Ok(self.mult(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::AcesAlgebra;
    use crate::{AcesParametersBuilder, ArithChannel, Error};
    use aces_traits::{AcesDecrypter, AcesEncrypter};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::error::Error as StdError;

    fn setup(
        seed: u64,
    ) -> Result<
        (
            ArithChannel,
            AcesAlgebra,
            ChaCha8Rng,
        ),
        Box<dyn StdError>,
    > {
        let params = AcesParametersBuilder::new()
            .set_plaintext_modulus(4)
            .set_cipher_modulus(47601551)
            .set_degree(5)
            .set_width(10)
            .build_arc()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let channel = ArithChannel::generate(&params, &mut rng)?;
        let algebra = AcesAlgebra::new(&channel.public_key());
        Ok((channel, algebra, rng))
    }

    #[test]
    fn additive_homomorphism() -> Result<(), Box<dyn StdError>> {
        let (channel, algebra, mut rng) = setup(23)?;
        let pk = channel.public_key();
        let sk = channel.secret_key();
        for (m1, m2) in [(3u64, 2u64), (0, 0), (1, 3), (3, 3)] {
            let (c1, _) = pk.try_encrypt(m1, &mut rng)?;
            let (c2, _) = pk.try_encrypt(m2, &mut rng)?;
            let sum = algebra.add(&c1, &c2);
            assert_eq!(sum.uplvl(), c1.uplvl() + c2.uplvl());
            assert_eq!(sk.try_decrypt(&sum)?.value(), (m1 + m2) % 4);
        }
        Ok(())
    }

    #[test]
    fn multiplicative_homomorphism() -> Result<(), Box<dyn StdError>> {
        let (channel, algebra, mut rng) = setup(29)?;
        let pk = channel.public_key();
        let sk = channel.secret_key();
        for (m1, m2) in [(3u64, 2u64), (0, 3), (1, 3), (2, 2)] {
            let (c1, _) = pk.try_encrypt(m1, &mut rng)?;
            let (c2, _) = pk.try_encrypt(m2, &mut rng)?;
            let product = algebra.mult(&c1, &c2);
            assert_eq!(product.uplvl(), c1.uplvl() * c2.uplvl() * 4);
            assert_eq!(sk.try_decrypt(&product)?.value(), (m1 * m2) % 4);
        }
        Ok(())
    }

    #[test]
    fn operations_commute() -> Result<(), Box<dyn StdError>> {
        let (channel, algebra, mut rng) = setup(31)?;
        let pk = channel.public_key();
        let sk = channel.secret_key();
        let (c1, _) = pk.try_encrypt(3, &mut rng)?;
        let (c2, _) = pk.try_encrypt(2, &mut rng)?;

        assert_eq!(algebra.add(&c1, &c2), algebra.add(&c2, &c1));
        assert_eq!(
            sk.try_decrypt(&algebra.mult(&c1, &c2))?.value(),
            sk.try_decrypt(&algebra.mult(&c2, &c1))?.value()
        );
        Ok(())
    }

    #[test]
    fn refresh_gates_invalid_levels() -> Result<(), Box<dyn StdError>> {
        let (channel, algebra, mut rng) = setup(37)?;
        let (ct, _) = channel.public_key().try_encrypt(2, &mut rng)?;

        assert!(matches!(
            algebra.refresh(&ct, 0),
            Err(Error::RefreshError(_))
        ));
        assert!(matches!(
            algebra.refresh(&ct, ct.uplvl() + 1),
            Err(Error::RefreshError(_))
        ));
        Ok(())
    }
}
