//! The digest adapter: an interface to a pluggable 64-byte hash.
//!
//! The hash function implementation itself is treated as an external
//! collaborator. `DigestFn` is the interface; [`streebog_512`] is a concrete
//! default backed by the `streebog` crate so the file driver and CLI are
//! runnable without a caller-supplied hash.

use digest::Digest;

use crate::error::{GostError, Result};

/// A pluggable digest function: bytes in, 64-byte digest out.
pub type DigestFn = fn(&[u8]) -> Vec<u8>;

/// GOST R 34.11-2012 (Streebog-512), the default digest adapter.
pub fn streebog_512(data: &[u8]) -> Vec<u8> {
    streebog::Streebog512::digest(data).to_vec()
}

/// Validate that a digest adapter's output is exactly 64 bytes, as the
/// envelope and the signature equations require.
pub fn require_64(d: &[u8]) -> Result<&[u8; 64]> {
    d.try_into()
        .map_err(|_| GostError::DigestLength { got: d.len() })
}
