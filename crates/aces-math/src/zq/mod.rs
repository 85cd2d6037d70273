#![warn(missing_docs, unused_imports)]

//! Ring operations for moduli up to 62 bits.
//!
//! Unlike an NTT-oriented modulus, the modulus used by an arithmetic channel
//! is composite, so inversion goes through the extended gcd and is partial.

use std::ops::Deref;

use crate::errors::{Error, Result};
use itertools::{izip, Itertools};
use num_bigint::BigUint;
use num_traits::cast::ToPrimitive;
use rand::{distr::Uniform, CryptoRng, Rng, RngCore};

/// cond ? on_true : on_false
const fn const_time_cond_select(on_true: u64, on_false: u64, cond: bool) -> u64 {
    let mask = -(cond as i64) as u64;
    let diff = on_true ^ on_false;
    (diff & mask) ^ on_false
}

/// Structure encapsulating an integer modulus up to 62 bits.
#[derive(Debug, Clone)]
pub struct Modulus {
    pub(crate) p: u64,
    barrett_hi: u64,
    barrett_lo: u64,
    distribution: Uniform<u64>,
}

// We need to declare Eq manually because of the `Uniform` member.
impl Eq for Modulus {}

impl PartialEq for Modulus {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            p,
            barrett_hi: _,
            barrett_lo: _,
            distribution: _,
        } = self;
        let Self {
            p: other_p,
            barrett_hi: _,
            barrett_lo: _,
            distribution: _,
        } = other;

        // All other fields are deterministically derived from p.
        p == other_p
    }
}

// Override the dereference to return the underlying modulus.
impl Deref for Modulus {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.p
    }
}

impl Modulus {
    /// Create a modulus from an integer of at most 62 bits.
    pub fn new(p: u64) -> Result<Self> {
        if p < 2 || (p >> 62) != 0 {
            Err(Error::InvalidModulus(p))
        } else {
            let barrett = ((BigUint::from(1u64) << 128usize) / p).to_u128().unwrap(); // 2^128 / p
            Ok(Self {
                p,
                barrett_hi: (barrett >> 64) as u64,
                barrett_lo: barrett as u64,
                distribution: Uniform::new(0, p).unwrap(),
            })
        }
    }

    /// Performs the modular addition of a and b in constant time.
    /// Aborts if a >= p or b >= p in debug mode.
    #[must_use]
    pub const fn add(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        Self::reduce1(a + b, self.p)
    }

    /// Performs the modular subtraction of a and b in constant time.
    /// Aborts if a >= p or b >= p in debug mode.
    #[must_use]
    pub const fn sub(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        Self::reduce1(a + self.p - b, self.p)
    }

    /// Performs the modular multiplication of a and b in constant time.
    /// Aborts if a >= p or b >= p in debug mode.
    #[must_use]
    pub const fn mul(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        self.reduce_u128((a as u128) * (b as u128))
    }

    /// Modular negation in constant time.
    ///
    /// Aborts if a >= p in debug mode.
    #[must_use]
    pub const fn neg(&self, a: u64) -> u64 {
        debug_assert!(a < self.p);
        Self::reduce1(self.p - a, self.p)
    }

    /// Modular exponentiation in variable time.
    ///
    /// Aborts if a >= p in debug mode.
    #[must_use]
    pub fn pow(&self, a: u64, n: u64) -> u64 {
        debug_assert!(a < self.p);

        if n == 0 {
            1
        } else if n == 1 {
            a
        } else {
            let mut r = a;
            let mut i = (63 - n.leading_zeros()) as isize - 1;
            while i >= 0 {
                r = self.mul(r, r);
                if (n >> i) & 1 == 1 {
                    r = self.mul(r, a);
                }
                i -= 1;
            }
            r
        }
    }

    /// Modular inversion in variable time.
    ///
    /// The modulus does not need to be prime: the inverse is computed through
    /// the extended gcd, and `None` is returned when gcd(a, p) != 1.
    /// Aborts if a >= p in debug mode.
    #[must_use]
    pub fn inv(&self, a: u64) -> Option<u64> {
        debug_assert!(a < self.p);
        let r = aces_util::inverse(a, self.p)?;
        debug_assert_eq!(self.mul(a, r), 1);
        Some(r)
    }

    /// Modular reduction of a u128 in constant time.
    ///
    /// The operand must be smaller than 2^124, which holds in particular for
    /// any product of two reduced values.
    #[must_use]
    pub const fn reduce_u128(&self, a: u128) -> u64 {
        Self::reduce1(self.lazy_reduce_u128(a), self.p)
    }

    /// Modular reduction of a u64 in constant time.
    #[must_use]
    pub const fn reduce(&self, a: u64) -> u64 {
        Self::reduce1(self.lazy_reduce(a), self.p)
    }

    /// Return x mod p in constant time.
    /// Aborts if x >= 2 * p in debug mode.
    const fn reduce1(x: u64, p: u64) -> u64 {
        debug_assert!(p >> 63 == 0);
        debug_assert!(x < 2 * p);

        let r = const_time_cond_select(x, x.wrapping_sub(p), x < p);

        debug_assert!(r == x % p);

        r
    }

    /// Lazy modular reduction of a in constant time.
    /// The output is in the interval [0, 2 * p).
    const fn lazy_reduce_u128(&self, a: u128) -> u64 {
        let a_lo = a as u64;
        let a_hi = (a >> 64) as u64;
        let p_lo_lo = ((a_lo as u128) * (self.barrett_lo as u128)) >> 64;
        let p_hi_lo = (a_hi as u128) * (self.barrett_lo as u128);
        let p_lo_hi = (a_lo as u128) * (self.barrett_hi as u128);

        let q = ((p_lo_hi + p_hi_lo + p_lo_lo) >> 64) + (a_hi as u128) * (self.barrett_hi as u128);
        let r = (a - q * (self.p as u128)) as u64;

        debug_assert!((r as u128) < 2 * (self.p as u128));
        debug_assert!(r % self.p == (a % (self.p as u128)) as u64);

        r
    }

    /// Lazy modular reduction of a in constant time.
    /// The output is in the interval [0, 2 * p).
    const fn lazy_reduce(&self, a: u64) -> u64 {
        let p_lo_lo = ((a as u128) * (self.barrett_lo as u128)) >> 64;
        let p_lo_hi = (a as u128) * (self.barrett_hi as u128);

        let q = (p_lo_hi + p_lo_lo) >> 64;
        let r = (a as u128 - q * (self.p as u128)) as u64;

        debug_assert!((r as u128) < 2 * (self.p as u128));
        debug_assert!(r % self.p == a % self.p);

        r
    }

    /// Modular addition of vectors in place in constant time.
    ///
    /// Aborts if a and b differ in size, and if any of their values is >= p in
    /// debug mode.
    pub fn add_vec(&self, a: &mut [u64], b: &[u64]) {
        debug_assert_eq!(a.len(), b.len());
        izip!(a.iter_mut(), b.iter()).for_each(|(ai, bi)| *ai = self.add(*ai, *bi))
    }

    /// Modular subtraction of vectors in place in constant time.
    ///
    /// Aborts if a and b differ in size, and if any of their values is >= p in
    /// debug mode.
    pub fn sub_vec(&self, a: &mut [u64], b: &[u64]) {
        debug_assert_eq!(a.len(), b.len());
        izip!(a.iter_mut(), b.iter()).for_each(|(ai, bi)| *ai = self.sub(*ai, *bi))
    }

    /// Modular negation of a vector in place in constant time.
    ///
    /// Aborts if any of the values in the vector is >= p in debug mode.
    pub fn neg_vec(&self, a: &mut [u64]) {
        a.iter_mut().for_each(|ai| *ai = self.neg(*ai))
    }

    /// Modular scalar multiplication of a vector in place in constant time.
    ///
    /// Aborts if b or any of the values in a is >= p in debug mode.
    pub fn scalar_mul_vec(&self, a: &mut [u64], b: u64) {
        debug_assert!(b < self.p);
        a.iter_mut().for_each(|ai| *ai = self.mul(*ai, b))
    }

    /// Reduce a vector in place in constant time.
    pub fn reduce_vec(&self, a: &mut [u64]) {
        a.iter_mut().for_each(|ai| *ai = self.reduce(*ai))
    }

    /// Returns a random element of Z_p.
    pub fn random<R: RngCore + CryptoRng>(&self, rng: &mut R) -> u64 {
        rng.sample(self.distribution)
    }

    /// Returns a vector of random elements of Z_p.
    pub fn random_vec<R: RngCore + CryptoRng>(&self, size: usize, rng: &mut R) -> Vec<u64> {
        rng.sample_iter(self.distribution).take(size).collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::Modulus;
    use proptest::prelude::{any, BoxedStrategy, Strategy};
    use rand::rng;

    // Strategy for a mix of small and random moduli, prime and composite.
    fn valid_moduli() -> BoxedStrategy<Modulus> {
        any::<u64>()
            .prop_map(|p| Modulus::new(2 + p % ((1 << 62) - 2)).unwrap())
            .boxed()
    }

    #[test]
    fn constructor() {
        assert!(Modulus::new(0).is_err());
        assert!(Modulus::new(1).is_err());
        assert!(Modulus::new(1 << 62).is_err());
        assert!(Modulus::new(u64::MAX).is_err());
        assert!(Modulus::new(2).is_ok());
        assert!(Modulus::new((1 << 62) - 1).is_ok());
    }

    proptest! {
        #[test]
        fn add(p in valid_moduli(), mut a: u64, mut b: u64) {
            a = p.reduce(a);
            b = p.reduce(b);
            prop_assert_eq!(p.add(a, b), ((a as u128 + b as u128) % (*p as u128)) as u64);
        }

        #[test]
        fn sub(p in valid_moduli(), mut a: u64, mut b: u64) {
            a = p.reduce(a);
            b = p.reduce(b);
            prop_assert_eq!(
                p.sub(a, b),
                ((a as u128 + *p as u128 - b as u128) % (*p as u128)) as u64
            );
        }

        #[test]
        fn mul(p in valid_moduli(), mut a: u64, mut b: u64) {
            a = p.reduce(a);
            b = p.reduce(b);
            prop_assert_eq!(
                p.mul(a, b),
                ((a as u128 * b as u128) % (*p as u128)) as u64
            );
        }

        #[test]
        fn neg(p in valid_moduli(), mut a: u64) {
            a = p.reduce(a);
            prop_assert_eq!(p.neg(a), if a == 0 { 0 } else { *p - a });
        }

        #[test]
        fn reduce_u128(p in valid_moduli(), a: u64, b: u64) {
            // Operands the size of products of two 62-bit values.
            let ab = ((a >> 2) as u128) * ((b >> 2) as u128);
            prop_assert_eq!(p.reduce_u128(ab), (ab % (*p as u128)) as u64);
        }

        #[test]
        fn inv(p in valid_moduli(), mut a: u64) {
            a = p.reduce(a);
            match p.inv(a) {
                Some(inv_a) => prop_assert_eq!(p.mul(a, inv_a), 1),
                None => prop_assert_ne!(aces_util::gcd(a, *p), 1),
            }
        }

        #[test]
        fn pow(p in valid_moduli(), mut a: u64, n in 0u64..256) {
            a = p.reduce(a);
            let mut expected = 1u64;
            for _ in 0..n {
                expected = p.mul(expected, a);
            }
            prop_assert_eq!(p.pow(a, n), expected);
        }

        #[test]
        fn random_vec(p in valid_moduli(), size in 1..1000usize) {
            let mut rng = rng();

            let v = p.random_vec(size, &mut rng);
            prop_assert_eq!(v.len(), size);
            prop_assert!(v.iter().all(|vi| *vi < *p));

            let w = p.random_vec(size, &mut rng);
            prop_assert_eq!(w.len(), size);

            if (*p).leading_zeros() <= 30 && size >= 8 {
                prop_assert_ne!(v, w); // This will hold with probability at least 2^(-30)
            }
        }
    }
}
