use thiserror::Error;

/// A specialized [Result](core::result::Result) for fallible suite operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The reasons an operation can refuse its inputs or its output.
///
/// Signature verification never produces an [Error]; it returns `false`.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// A variable-length input exceeds its maximum size.
    #[error("{what}: invalid length (max {max}, got {actual})")]
    InvalidLength {
        /// The input being checked.
        what: &'static str,
        /// The largest accepted length.
        max: usize,
        /// The length supplied.
        actual: usize,
    },

    /// The bytes do not decode to a valid curve point, or the point is not acceptable for the
    /// operation (e.g. a small-order peer key).
    #[error("invalid encoding")]
    InvalidEncoding,

    /// The bytes decode to a point, but not from its unique canonical encoding.
    #[error("non-canonical encoding")]
    NonCanonicalEncoding,

    /// The operation produced the zero scalar, the identity point, or an all-zero shared secret.
    #[error("degenerate result")]
    DegenerateResult,
}
