//! Secret keys for the ACES encryption scheme.

use crate::ciphertext::Ciphertext;
use crate::errors::{Error, Result};
use crate::level::LevelVec;
use crate::parameters::AcesParameters;
use crate::plaintext::Plaintext;
use aces_math::ru::{dot_product, Context, Poly};
use aces_traits::{AcesDecrypter, AcesEncrypter, Parametrized};
use rand::{CryptoRng, Rng, RngCore};
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret key for the ACES encryption scheme: the n-vector x of uniform
/// elements of Z_q\[X\]/(u).
pub struct SecretKey {
    pub(crate) par: Arc<AcesParameters>,
    pub(crate) ctx: Arc<Context>,
    pub(crate) x: Box<[Poly]>,
    pub(crate) lvl_e: Box<[u64]>,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.x.iter_mut().for_each(|xi| xi.zeroize());
    }
}

impl ZeroizeOnDrop for SecretKey {}

impl SecretKey {
    pub(crate) fn new(
        par: &Arc<AcesParameters>,
        ctx: &Arc<Context>,
        x: Box<[Poly]>,
        lvl_e: &[u64],
    ) -> Self {
        Self {
            par: par.clone(),
            ctx: ctx.clone(),
            x,
            lvl_e: lvl_e.to_vec().into_boxed_slice(),
        }
    }
}

impl Parametrized for SecretKey {
    type Parameters = AcesParameters;
}

impl AcesDecrypter<Ciphertext> for SecretKey {
    type Error = Error;
    type Plaintext = Plaintext;

    /// Decrypts a ciphertext: d = c' - c^T x reduced modulo u, evaluated at
    /// omega = 1, then reduced modulo p.
    ///
    /// A saturated ciphertext (uplvl >= q / p) is still decrypted, but the
    /// output carries a warning flag since the value may have wrapped.
    fn try_decrypt(&self, ct: &Ciphertext) -> Result<Plaintext> {
        if self.par != ct.par {
            return Err(Error::UnspecifiedInput(
                "Incompatible channel parameters".to_string(),
            ));
        }

        let mut cx = dot_product(ct.c.iter(), self.x.iter());
        let mut d = &ct.c_prime - &cx;
        let v = d.eval_at_omega();
        cx.zeroize();
        d.zeroize();

        let saturated = self.par.is_saturating(ct.uplvl);
        if saturated {
            log::warn!(
                "decrypting a ciphertext whose level bound {} reached q / p; the value may be incorrect",
                ct.uplvl
            );
        }

        Ok(Plaintext {
            value: v % self.par.plaintext(),
            saturated,
        })
    }
}

impl AcesEncrypter<Ciphertext, LevelVec> for SecretKey {
    type Error = Error;

    /// Symmetric-mode encryption, available to the channel owner: the
    /// decomposition vector is drawn directly and the message is concealed as
    /// c' = r_m + e + c^T x, with e a vanisher evaluating to p * delta.
    fn try_encrypt<R: RngCore + CryptoRng>(
        &self,
        m: u64,
        rng: &mut R,
    ) -> Result<(Ciphertext, LevelVec)> {
        let p = self.par.plaintext();
        if m >= p {
            log::warn!("the input is encrypted as {} (reduced modulo {p})", m % p);
        }
        let m = m % p;

        let c = (0..self.par.degree())
            .map(|_| Poly::random(&self.ctx, rng))
            .collect::<Vec<_>>();

        // The level vector must keep under-estimating the true noise, so a
        // noisy vanisher is only drawn when some published vanisher level can
        // account for it.
        let slot = self.lvl_e.iter().position(|d| *d == 1);
        let delta: u64 = match slot {
            Some(_) if !rng.random_bool(self.par.zero_noise_probability()) => 1,
            _ => 0,
        };
        let mut e = Poly::random_with_eval(&self.ctx, p * delta, rng);
        let mut r_m = Poly::random_with_eval(&self.ctx, m, rng);

        let mut c_prime = dot_product(c.iter(), self.x.iter());
        c_prime += &r_m;
        c_prime += &e;

        e.zeroize();
        r_m.zeroize();

        let mut k = vec![0u128; self.par.width()];
        if delta == 1 {
            k[slot.unwrap()] = 1;
        }

        Ok((
            Ciphertext {
                par: self.par.clone(),
                c: c.into_boxed_slice(),
                c_prime,
                uplvl: 1,
            },
            LevelVec::new(k),
        ))
    }
}
