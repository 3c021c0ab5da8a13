//! GOST R 34.10-2012 file-signing toolkit.
//!
//! Creates and verifies digital signatures over arbitrary files, with file
//! contents hashed by a pluggable 64-byte digest (GOST R 34.11-2012
//! "Streebog" by default). A signature is a self-contained DER envelope
//! carrying the signature scalars, the full domain parameters, and a small
//! metadata record; see [`envelope::Envelope`].
//!
//! The security-critical subsystems are [`curve`] (512-bit prime-field
//! elliptic-curve arithmetic) and [`envelope`] (the strictly-typed DER
//! wire format); [`signer`] and [`verifier`] implement the GOST R
//! 34.10-2012 equations on top of [`curve`]; [`file`] ties hashing,
//! signing/verifying and on-disk persistence together.
//!
//! Not constant-time: arithmetic and comparisons throughout run in
//! variable time. Constant-time hardening is a separate, not-yet-undertaken
//! goal (see DESIGN.md).

pub mod bigint;
pub mod curve;
pub mod der;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod file;
pub mod signer;
pub mod verifier;

pub use bigint::PrivateScalar;
pub use curve::{AffinePoint, Curve, ParamSet};
pub use envelope::Envelope;
pub use error::{GostError, Result};
pub use file::{sign_file, sign_file_default, verify_file, verify_file_default};
pub use signer::{sign, Signature};
pub use verifier::verify;
