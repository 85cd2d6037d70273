//! Public keys for the ACES encryption scheme.

use crate::ciphertext::Ciphertext;
use crate::errors::Result;
use crate::level::LevelVec;
use crate::parameters::AcesParameters;
use aces_math::ru::{dot_product, Context, Poly};
use aces_traits::{AcesEncrypter, Parametrized};
use ndarray::{Array2, Array3};
use rand::{CryptoRng, Rng, RngCore};
use std::sync::Arc;
use zeroize::Zeroize;

/// The published portion of an arithmetic channel.
///
/// It consists of the parameters (p, q, n, N), the reduction polynomial u
/// carried by the context, the initializer matrix f0, the noisy key
/// f1 = f0 x + e', the 3-tensor linearizing products of secret-key
/// components, and the levels of the vanishers e'. None of these reveal the
/// secret key, and the whole structure is immutable and freely shareable.
#[derive(Debug, Clone, PartialEq)]
pub struct AcesPublicKey {
    pub(crate) par: Arc<AcesParameters>,
    pub(crate) ctx: Arc<Context>,
    pub(crate) f0: Array2<Poly>,
    pub(crate) f1: Box<[Poly]>,
    pub(crate) tensor: Array3<u64>,
    pub(crate) lvl_e: Box<[u64]>,
}

impl AcesPublicKey {
    pub(crate) fn new(
        par: &Arc<AcesParameters>,
        ctx: &Arc<Context>,
        f0: Array2<Poly>,
        f1: Vec<Poly>,
        tensor: Array3<u64>,
        lvl_e: Vec<u64>,
    ) -> Self {
        Self {
            par: par.clone(),
            ctx: ctx.clone(),
            f0,
            f1: f1.into_boxed_slice(),
            tensor,
            lvl_e: lvl_e.into_boxed_slice(),
        }
    }

    /// Returns the parameters of the channel.
    pub const fn parameters(&self) -> &Arc<AcesParameters> {
        &self.par
    }

    /// Returns the polynomial context of the channel, carrying q, n, and u.
    pub const fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    /// Returns the initializer matrix f0, of shape N x n.
    pub const fn initializer(&self) -> &Array2<Poly> {
        &self.f0
    }

    /// Returns the noisy key f1 = f0 x + e'.
    pub fn noisy_key(&self) -> &[Poly] {
        &self.f1
    }

    /// Returns the 3-tensor lambda, of shape n x n x (n + 1); index 0 of the
    /// last axis is the coefficient of the constant 1.
    pub const fn tensor(&self) -> &Array3<u64> {
        &self.tensor
    }

    /// Returns the levels of the vanishers e': entry i is delta_i, with
    /// e'_i(1) = p * delta_i.
    pub fn vanisher_levels(&self) -> &[u64] {
        &self.lvl_e
    }

    /// The documented level bound of a fresh encryption: each component of
    /// the decomposition vector contributes at most p times the level of the
    /// matching vanisher.
    pub(crate) fn fresh_uplvl(&self) -> u128 {
        let sum: u128 = self.lvl_e.iter().map(|d| *d as u128).sum();
        sum * self.par.plaintext() as u128
    }
}

impl Parametrized for AcesPublicKey {
    type Parameters = AcesParameters;
}

impl AcesEncrypter<Ciphertext, LevelVec> for AcesPublicKey {
    type Error = crate::Error;

    /// Encrypts `m` with the public key: c = f0^T b and c' = r_m + b^T f1,
    /// where each b_i evaluates at omega to a uniform beta_i in {0, ..., p}
    /// and r_m evaluates to m.
    ///
    /// The returned level vector records the beta_i; its dot product with the
    /// published vanisher levels is the exact noise of the fresh ciphertext.
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
        let n = self.par.degree();
        let width = self.par.width();

        let mut betas = Vec::with_capacity(width);
        let mut b = Vec::with_capacity(width);
        for _ in 0..width {
            let beta = rng.random_range(0..=p);
            betas.push(beta as u128);
            b.push(Poly::random_with_eval(&self.ctx, beta, rng));
        }

        let mut r_m = Poly::random_with_eval(&self.ctx, m, rng);

        let c = (0..n)
            .map(|j| {
                let column = self.f0.column(j);
                dot_product(b.iter(), column.iter())
            })
            .collect::<Vec<_>>();

        let mut c_prime = dot_product(b.iter(), self.f1.iter());
        c_prime += &r_m;

        // b evaluates to the secret levels and r_m to the message; neither
        // may outlive the encryption.
        b.iter_mut().for_each(|bi| bi.zeroize());
        r_m.zeroize();

        Ok((
            Ciphertext {
                par: self.par.clone(),
                c: c.into_boxed_slice(),
                c_prime,
                uplvl: self.fresh_uplvl(),
            },
            LevelVec::new(betas),
        ))
    }
}
