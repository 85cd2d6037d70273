use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Indicates an invalid modulus.
    #[error("Invalid modulus: modulus {0} should be between 2 and 2^62 - 1")]
    InvalidModulus(u64),

    /// Indicates an invalid reduction polynomial.
    #[error("Invalid reduction polynomial: {0}")]
    InvalidReductionPolynomial(String),

    /// Indicates that the number of coefficients does not fit the ring.
    #[error("Invalid number of coefficients: got {0}, expected at most {1}")]
    InvalidCoefficientCount(usize, usize),

    /// Indicates that a linear system could not be solved over Z_q.
    #[error("Singular system: {0}")]
    SingularSystem(String),

    /// Indicates a generic error.
    #[error("{0}")]
    Default(String),
}
