use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Indicates that an error from the underlying mathematical library was
    /// encountered.
    #[error("{0}")]
    MathError(aces_math::Error),

    /// Indicates a parameter error.
    #[error("{0}")]
    ParametersError(ParametersError),

    /// Indicates that key generation failed; the caller may retry with a
    /// fresh draw of the secret key.
    #[error("Key generation failed: {0}")]
    GenerationError(String),

    /// Indicates that a ciphertext could not be refreshed; the caller may
    /// keep the un-refreshed ciphertext or restart with a smaller circuit.
    #[error("Refresh failed: {0}")]
    RefreshError(String),

    /// Indicates that an arithmetic expression could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Indicates that an input is invalid.
    #[error("{0}")]
    UnspecifiedInput(String),
}

impl From<aces_math::Error> for Error {
    fn from(e: aces_math::Error) -> Self {
        Error::MathError(e)
    }
}

/// Separate enum to indicate parameters-related errors.
#[derive(Debug, Error, PartialEq)]
pub enum ParametersError {
    /// Indicates that the plaintext modulus is invalid.
    #[error("Invalid plaintext modulus: {0}, expected an integer of at least 2")]
    InvalidPlaintextModulus(u64),

    /// Indicates that the cipher modulus does not dominate the square of the
    /// plaintext modulus.
    #[error("Invalid cipher modulus: {0} should be larger than p^2 = {1}")]
    CipherModulusTooSmall(u64, u64),

    /// Indicates that the cipher modulus is too large to be represented.
    #[error("Invalid cipher modulus: {0} should be smaller than 2^62")]
    CipherModulusTooLarge(u64),

    /// Indicates that the two moduli are not coprime.
    #[error("Invalid moduli: gcd({0}, {1}) should be 1")]
    ModuliNotCoprime(u64, u64),

    /// Indicates that the cipher modulus is a prime power, hence does not
    /// have two distinct prime factors.
    #[error("Invalid cipher modulus: {0} is a prime power")]
    CipherModulusPrimePower(u64),

    /// Indicates that no composite replacement was found near a prime cipher
    /// modulus.
    #[error("No composite cipher modulus found near {0}")]
    NoCompositeModulus(u64),

    /// Indicates that the degree is invalid.
    #[error("Invalid degree: {0}, expected an integer strictly larger than 4")]
    InvalidDegree(usize),

    /// Indicates that the ciphertext width is invalid.
    #[error("Invalid width: {0}, expected an integer of at least 1")]
    InvalidWidth(usize),

    /// Indicates that the probability of sampling a noiseless vanisher is
    /// invalid.
    #[error("Invalid probability: {0}, expected a value in [0, 1]")]
    InvalidProbability(f64),

    /// Indicates that too few parameters were specified.
    #[error("{0}")]
    TooFewSpecified(String),
}
