#![crate_name = "aces"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! The ACES (Arithmetic Channel Encryption Scheme) leveled fully-homomorphic
//! encryption scheme.
//!
//! Ciphertexts live over the truncated polynomial ring Z_q\[X\]/(u), where u
//! is monic of degree n and vanishes at omega = 1 modulo q. A channel
//! publishes an initializer matrix f0, a noisy key f1 = f0 x + e', and a
//! 3-tensor linearizing products of secret-key components; ciphertexts
//! support homomorphic addition and multiplication, and a non-bootstrapping
//! refresh operation lowers the public noise bound of a ciphertext using
//! levels tracked in parallel by the data owner.
//!
//! ```
//! use aces::{AcesAlgebra, AcesParametersBuilder, ArithChannel};
//! use aces_traits::{AcesDecrypter, AcesEncrypter};
//!
//! let mut rng = rand::rng();
//! let params = AcesParametersBuilder::new()
//!     .set_plaintext_modulus(4)
//!     .set_cipher_modulus(47601551)
//!     .set_degree(5)
//!     .set_width(10)
//!     .build_arc()
//!     .unwrap();
//! let channel = ArithChannel::generate(&params, &mut rng).unwrap();
//! let pk = channel.public_key();
//!
//! let (c1, _) = pk.try_encrypt(3, &mut rng).unwrap();
//! let (c2, _) = pk.try_encrypt(2, &mut rng).unwrap();
//! let algebra = AcesAlgebra::new(&pk);
//! let sum = algebra.add(&c1, &c2);
//!
//! let decrypted = channel.secret_key().try_decrypt(&sum).unwrap();
//! assert_eq!(decrypted.value(), 1); // (3 + 2) mod 4
//! ```

mod algebra;
mod channel;
mod ciphertext;
mod circuit;
mod errors;
mod keys;
mod level;
mod parameters;
mod plaintext;
mod refresher;

pub use algebra::AcesAlgebra;
pub use channel::ArithChannel;
pub use ciphertext::Ciphertext;
pub use circuit::{Circuit, PlainDomain};
pub use errors::{Error, ParametersError, Result};
pub use keys::{AcesPublicKey, SecretKey};
pub use level::LevelVec;
pub use parameters::{AcesParameters, AcesParametersBuilder};
pub use plaintext::Plaintext;
pub use refresher::Refresher;
