use thiserror::Error;

/// Result alias used throughout `gost-sign`.
pub type Result<T> = std::result::Result<T, GostError>;

/// Error kinds produced by the curve, signer, verifier, envelope codec and
/// file driver.
///
/// `verify`/`verify_file` never propagate these for a well-formed envelope
/// decode: arithmetic failures during verification collapse to `false`
/// (see [`crate::verifier::verify`]). `sign`/`sign_file` only ever see
/// `SignFailed` wrapping whichever lower variant actually failed, since a
/// `r == 0`/`s == 0` hit is a resample, not an error.
#[derive(Debug, Error)]
pub enum GostError {
    /// The base-point equation `Gy^2 = Gx^3 + a*Gx + b (mod p)` does not
    /// hold, or reconstructed curve parameters are otherwise structurally
    /// invalid.
    #[error("invalid curve parameters")]
    InvalidCurve,

    /// `scalar_mul` was called with `k <= 1`, or a private scalar was out
    /// of the valid `[1, q-1]` range.
    #[error("bad scalar: {0}")]
    BadScalar(&'static str),

    /// The extended Euclidean algorithm found `gcd(a, n) != 1`.
    #[error("no modular inverse exists")]
    NoInverse,

    /// DER parse failure, structural mismatch, or `algo` field mismatch.
    #[error("bad envelope: {0}")]
    BadEnvelope(&'static str),

    /// The digest adapter returned a buffer whose length was not 64 bytes.
    #[error("digest adapter returned {got} bytes, expected 64")]
    DigestLength {
        /// Actual length returned by the adapter.
        got: usize,
    },

    /// File read/write failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Top-level wrapper returned by [`crate::file::sign_file`]. Preserves
    /// the wrapped kind for diagnostics.
    #[error("sign failed: {0}")]
    SignFailed(Box<GostError>),

    /// Top-level wrapper returned by [`crate::file::verify_file`]. Preserves
    /// the wrapped kind for diagnostics.
    #[error("verify failed: {0}")]
    VerifyFailed(Box<GostError>),
}
