//! Keys for the ACES encryption scheme.

mod public_key;
mod secret_key;

pub use public_key::AcesPublicKey;
pub use secret_key::SecretKey;
