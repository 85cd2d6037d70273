//! Implementation of operations over polynomials.

use super::{Context, Poly};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

impl AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, p: &Poly) {
        assert_eq!(self.ctx, p.ctx, "Incompatible contexts");
        self.ctx.q.add_vec(&mut self.coefficients, &p.coefficients)
    }
}

impl Add<&Poly> for &Poly {
    type Output = Poly;
    fn add(self, p: &Poly) -> Poly {
        let mut q = self.clone();
        q += p;
        q
    }
}

impl SubAssign<&Poly> for Poly {
    fn sub_assign(&mut self, p: &Poly) {
        assert_eq!(self.ctx, p.ctx, "Incompatible contexts");
        self.ctx.q.sub_vec(&mut self.coefficients, &p.coefficients)
    }
}

impl Sub<&Poly> for &Poly {
    type Output = Poly;
    fn sub(self, p: &Poly) -> Poly {
        let mut q = self.clone();
        q -= p;
        q
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        let mut out = self.clone();
        out.ctx.q.neg_vec(&mut out.coefficients);
        out
    }
}

impl Mul<&Poly> for &Poly {
    type Output = Poly;
    fn mul(self, p: &Poly) -> Poly {
        assert_eq!(self.ctx, p.ctx, "Incompatible contexts");

        // Schoolbook product into a buffer of length 2n - 1, then exact
        // division by the monic reduction polynomial.
        let q = &self.ctx.q;
        let n = self.ctx.degree;
        let mut t = vec![0u64; 2 * n - 1];
        for (i, ai) in self.coefficients.iter().enumerate() {
            if *ai == 0 {
                continue;
            }
            for (j, bj) in p.coefficients.iter().enumerate() {
                t[i + j] = q.add(t[i + j], q.mul(*ai, *bj));
            }
        }
        reduce_by_u(&self.ctx, &mut t);
        t.truncate(n);

        Poly {
            ctx: self.ctx.clone(),
            coefficients: t.into_boxed_slice(),
        }
    }
}

impl Mul<u64> for &Poly {
    type Output = Poly;
    fn mul(self, s: u64) -> Poly {
        let mut out = self.clone();
        out.ctx
            .q
            .scalar_mul_vec(&mut out.coefficients, out.ctx.q.reduce(s));
        out
    }
}

/// Reduces the coefficient buffer in place modulo the reduction polynomial of
/// the context.
///
/// Since u is monic, each step cancels the leading term exactly, and the
/// operation leaves evaluations at omega unchanged because u(1) = 0 mod q.
fn reduce_by_u(ctx: &Context, t: &mut [u64]) {
    let q = &ctx.q;
    let n = ctx.degree;
    for d in (n..t.len()).rev() {
        let lead = t[d];
        if lead == 0 {
            continue;
        }
        t[d] = 0;
        let shift = d - n;
        for (k, uk) in ctx.u.iter().take(n).enumerate() {
            if *uk != 0 {
                t[shift + k] = q.sub(t[shift + k], q.mul(lead, *uk));
            }
        }
    }
}

/// Computes the dot product between two iterators of polynomials.
///
/// Panics when the iterators are empty or when the underlying contexts are
/// incompatible.
pub fn dot_product<'a, 'b, I, J>(p: I, q: J) -> Poly
where
    I: Iterator<Item = &'a Poly>,
    J: Iterator<Item = &'b Poly>,
{
    let mut out: Option<Poly> = None;
    for (pi, qi) in p.zip(q) {
        let term = pi * qi;
        match out.as_mut() {
            Some(acc) => *acc += &term,
            None => out = Some(term),
        }
    }
    out.expect("dot product of empty iterators")
}
