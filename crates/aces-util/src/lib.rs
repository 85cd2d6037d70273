#![crate_name = "aces_util"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Number-theoretic utilities for the aces.rs library.

use num_bigint_dig::{prime::probably_prime, BigUint, ModInverse};
use num_traits::cast::ToPrimitive;

/// Returns whether the integer p is prime; this function is 100% accurate.
pub fn is_prime(p: u64) -> bool {
    probably_prime(&BigUint::from(p), 0)
}

/// Computes the modular multiplicative inverse of `a` modulo `p`. Returns
/// `None` if `a` is not invertible modulo `p`.
pub fn inverse(a: u64, p: u64) -> Option<u64> {
    let p = BigUint::from(p);
    let a = BigUint::from(a);
    a.mod_inverse(p)?.to_u64()
}

/// Computes the greatest common divisor of `a` and `b`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Returns whether `n` can be written as `r^k` with `r` prime and `k >= 2`.
///
/// Together with a (negative) primality check, this certifies that a modulus
/// has at least two distinct prime factors.
pub fn is_prime_power(n: u64) -> bool {
    if n < 4 {
        return false;
    }
    for k in 2..=n.ilog2() {
        let r = integer_root(n, k);
        if r >= 2 && r.checked_pow(k) == Some(n) && is_prime(r) {
            return true;
        }
    }
    false
}

/// The integer part of the k-th root of `n`, for `k >= 2`.
fn integer_root(n: u64, k: u32) -> u64 {
    debug_assert!(k >= 2);
    // A floating-point estimate, corrected by at most a few units.
    let mut r = (n as f64).powf(1f64 / (k as f64)).round() as u64;
    while r > 0 && r.checked_pow(k).map_or(true, |v| v > n) {
        r -= 1;
    }
    while (r + 1).checked_pow(k).is_some_and(|v| v <= n) {
        r += 1;
    }
    r
}
