#![warn(missing_docs, unused_imports)]

//! Polynomials in the truncated ring Z_q\[X\]/(u), where u is a monic
//! polynomial vanishing at omega = 1 modulo q.
//!
//! Because u(1) = 0 mod q, evaluation at omega is a ring homomorphism from
//! Z_q\[X\]/(u) onto Z_q; the arithmetic channel construction relies on this
//! homomorphism to plant prescribed evaluations inside otherwise uniform
//! polynomials.

mod ops;

pub use ops::dot_product;

use crate::errors::{Error, Result};
use crate::zq::Modulus;
use rand::{CryptoRng, Rng, RngCore};
use std::sync::Arc;
use zeroize::Zeroize;

/// Struct that holds the context associated with polynomials in
/// Z_q\[X\]/(u).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub(crate) q: Modulus,
    pub(crate) degree: usize,
    pub(crate) u: Box<[u64]>,
}

impl Context {
    /// Creates a context from a modulus and the coefficients of the reduction
    /// polynomial u, in increasing degree order.
    ///
    /// The polynomial must be monic of degree at least 1, with coefficients
    /// reduced modulo q, and must satisfy u(1) = 0 mod q.
    pub fn new(q: u64, u: &[u64]) -> Result<Self> {
        let q = Modulus::new(q)?;
        if u.len() < 2 {
            return Err(Error::InvalidReductionPolynomial(
                "the degree should be at least 1".to_string(),
            ));
        }
        let degree = u.len() - 1;
        if u[degree] != 1 {
            return Err(Error::InvalidReductionPolynomial(
                "the polynomial should be monic".to_string(),
            ));
        }
        if u.iter().any(|ui| *ui >= *q) {
            return Err(Error::InvalidReductionPolynomial(format!(
                "coefficients should be reduced modulo {}",
                *q
            )));
        }
        let eval = u.iter().fold(0u64, |acc, ui| q.add(acc, *ui));
        if eval != 0 {
            return Err(Error::InvalidReductionPolynomial(
                "the polynomial should vanish at 1 modulo q".to_string(),
            ));
        }
        Ok(Self {
            q,
            degree,
            u: u.to_vec().into_boxed_slice(),
        })
    }

    /// Generates a random context of the given degree: the reduction
    /// polynomial is monic with uniform coefficients, one of which is
    /// re-aligned so that u(1) = 0 mod q.
    pub fn random<R: RngCore + CryptoRng>(q: u64, degree: usize, rng: &mut R) -> Result<Self> {
        if degree < 1 {
            return Err(Error::InvalidReductionPolynomial(
                "the degree should be at least 1".to_string(),
            ));
        }
        let modulus = Modulus::new(q)?;
        let mut u = modulus.random_vec(degree, rng);
        let s = rng.random_range(0..degree);
        let mut eval = 1u64; // the monic leading coefficient
        for (i, ui) in u.iter().enumerate() {
            if i != s {
                eval = modulus.add(eval, *ui);
            }
        }
        u[s] = modulus.neg(eval);
        u.push(1);
        Self::new(q, &u)
    }

    /// Returns the degree of the reduction polynomial.
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the underlying integer modulus.
    pub const fn modulus(&self) -> u64 {
        self.q.p
    }

    /// Returns the operator implementing arithmetic modulo q.
    pub const fn modulus_operators(&self) -> &Modulus {
        &self.q
    }

    /// Returns the coefficients of the reduction polynomial, in increasing
    /// degree order.
    pub fn reduction_polynomial(&self) -> &[u64] {
        &self.u
    }
}

/// Struct that holds a polynomial of degree < n for a specific context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    ctx: Arc<Context>,
    coefficients: Box<[u64]>,
}

// Implements zeroization of polynomials.
impl Zeroize for Poly {
    fn zeroize(&mut self) {
        self.coefficients.zeroize()
    }
}

impl AsRef<Poly> for Poly {
    fn as_ref(&self) -> &Poly {
        self
    }
}

impl Poly {
    /// Creates a polynomial holding the constant 0.
    #[must_use]
    pub fn zero(ctx: &Arc<Context>) -> Self {
        Self {
            ctx: ctx.clone(),
            coefficients: vec![0u64; ctx.degree].into_boxed_slice(),
        }
    }

    /// Creates a polynomial holding the constant `value`.
    #[must_use]
    pub fn constant(ctx: &Arc<Context>, value: u64) -> Self {
        let mut coefficients = vec![0u64; ctx.degree];
        coefficients[0] = ctx.q.reduce(value);
        Self {
            ctx: ctx.clone(),
            coefficients: coefficients.into_boxed_slice(),
        }
    }

    /// Creates a polynomial from at most n coefficients in increasing degree
    /// order; missing coefficients are zero, and values are reduced modulo q.
    pub fn try_from_coefficients(ctx: &Arc<Context>, coefficients: &[u64]) -> Result<Self> {
        if coefficients.len() > ctx.degree {
            return Err(Error::InvalidCoefficientCount(
                coefficients.len(),
                ctx.degree,
            ));
        }
        let mut c = vec![0u64; ctx.degree];
        c[..coefficients.len()].copy_from_slice(coefficients);
        ctx.q.reduce_vec(&mut c);
        Ok(Self {
            ctx: ctx.clone(),
            coefficients: c.into_boxed_slice(),
        })
    }

    /// Generate a random polynomial.
    #[must_use]
    pub fn random<R: RngCore + CryptoRng>(ctx: &Arc<Context>, rng: &mut R) -> Self {
        Self {
            ctx: ctx.clone(),
            coefficients: ctx.q.random_vec(ctx.degree, rng).into_boxed_slice(),
        }
    }

    /// Generate a random polynomial whose evaluation at omega = 1 equals
    /// `target` modulo q.
    ///
    /// All coefficients are drawn uniformly, then the coefficient at a random
    /// position is re-aligned so that the sum of coefficients matches the
    /// target.
    #[must_use]
    pub fn random_with_eval<R: RngCore + CryptoRng>(
        ctx: &Arc<Context>,
        target: u64,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = ctx.q.random_vec(ctx.degree, rng);
        let s = rng.random_range(0..ctx.degree);
        let mut eval = 0u64;
        for (i, ci) in coefficients.iter().enumerate() {
            if i != s {
                eval = ctx.q.add(eval, *ci);
            }
        }
        coefficients[s] = ctx.q.sub(ctx.q.reduce(target), eval);
        Self {
            ctx: ctx.clone(),
            coefficients: coefficients.into_boxed_slice(),
        }
    }

    /// Evaluate the polynomial at omega = 1, i.e. the sum of its coefficients
    /// modulo q.
    #[must_use]
    pub fn eval_at_omega(&self) -> u64 {
        self.coefficients
            .iter()
            .fold(0u64, |acc, ci| self.ctx.q.add(acc, *ci))
    }

    /// Returns the coefficients of the polynomial, in increasing degree order.
    pub fn coefficients(&self) -> &[u64] {
        &self.coefficients
    }

    /// Returns the context of the polynomial.
    pub const fn ctx(&self) -> &Arc<Context> {
        &self.ctx
    }
}
