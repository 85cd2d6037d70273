#![crate_name = "aces_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Mathematical layer of the aces.rs library.
//!
//! This crate provides arithmetic modulo an integer of at most 62 bits
//! ([`zq::Modulus`]), polynomials in the truncated ring Z_q\[X\]/(u) where u
//! is monic and vanishes at 1 modulo q ([`ru::Poly`]), and a small linear
//! solver over Z_q used to linearize products of ring elements ([`linalg`]).

mod errors;

pub mod linalg;
pub mod ru;
pub mod zq;

pub use errors::{Error, Result};

#[cfg(test)]
#[macro_use]
extern crate proptest;

