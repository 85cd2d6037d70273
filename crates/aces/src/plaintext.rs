//! Decryption outputs.

/// The result of decrypting a ciphertext.
///
/// When the ciphertext was saturated at decryption time (its public level
/// bound reached q / p), the recovered value may disagree with the encrypted
/// message; the `saturated` flag reports this condition instead of refusing
/// to decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plaintext {
    pub(crate) value: u64,
    pub(crate) saturated: bool,
}

impl Plaintext {
    /// Returns the decrypted value in Z_p.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns whether the ciphertext was saturated at decryption time, in
    /// which case the value is not guaranteed to match the plaintext.
    pub const fn saturated(&self) -> bool {
        self.saturated
    }
}
