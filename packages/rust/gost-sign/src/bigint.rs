//! Big-endian byte/integer conversions and modular inverse.
//!
//! Everything in this module is big-endian except [`prv_unmarshal`] and the
//! `pub_marshal`/`pub_unmarshal` pair, which are the single little-endian
//! interpretations in the whole system. Keep them isolated here so the two
//! endiannesses never get mixed up by accident elsewhere.

use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{GostError, Result};

/// Lift an unsigned value into the signed domain, for transient subtraction
/// during curve arithmetic.
pub fn to_signed(n: &BigUint) -> BigInt {
    BigInt::from_biguint(num_bigint::Sign::Plus, n.clone())
}

/// Reduce `v` into `[0, modulus)`, normalizing a possibly-negative
/// transient subtraction result back into the unsigned range. All curve
/// arithmetic here stays non-negative except for these transient
/// subtractions, which must be normalized back explicitly.
pub fn pos_mod(v: &BigInt, modulus: &BigInt) -> BigInt {
    let r = v % modulus;
    if r.is_negative() {
        r + modulus
    } else {
        r
    }
}

/// Interpret `b` as a big-endian unsigned integer. Empty input is `0`.
pub fn bytes_to_int(b: &[u8]) -> BigUint {
    BigUint::from_bytes_be(b)
}

/// Return a `size`-byte big-endian representation of `n`, zero-padded on the
/// left. Fails with [`GostError::BadScalar`] if `n` does not fit in `size`
/// bytes.
pub fn int_to_bytes(n: &BigUint, size: usize) -> Result<Vec<u8>> {
    let raw = n.to_bytes_be();
    if raw.len() > size {
        return Err(GostError::BadScalar("integer does not fit in requested width"));
    }
    let mut out = vec![0u8; size - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Modular multiplicative inverse of `a` modulo `n` via the extended
/// Euclidean algorithm. Mirrors `gost/utils.py::modinvert`: negative `a` is
/// handled as `n - modinvert(-a, n)`. Fails with [`GostError::NoInverse`]
/// when `gcd(a, n) != 1`.
pub fn modinvert(a: &BigInt, n: &BigInt) -> Result<BigUint> {
    if a.is_negative() {
        let pos = modinvert(&-a, n)?;
        let n_u = n.magnitude().clone();
        return Ok(&n_u - pos);
    }

    let (mut r, mut newr) = (n.clone(), a.clone());
    let (mut t, mut newt) = (BigInt::zero(), BigInt::from(1));

    while !newr.is_zero() {
        let quotient = &r / &newr;
        let (tmp_t, tmp_r) = (&t - &quotient * &newt, &r - &quotient * &newr);
        t = newt;
        newt = tmp_t;
        r = newr;
        newr = tmp_r;
    }

    if r.magnitude() > &BigUint::from(1u8) {
        return Err(GostError::NoInverse);
    }

    if t.is_negative() {
        t += n;
    }
    Ok(t.magnitude().clone())
}

/// Decode the little-endian 32-byte private-key scalar. The single
/// little-endian conversion in the system: `prv_unmarshal(b) ==
/// bytes_to_int(reverse(b))`.
pub fn prv_unmarshal(b: &[u8; 32]) -> BigUint {
    let mut reversed = *b;
    reversed.reverse();
    bytes_to_int(&reversed)
}

/// Inverse of [`prv_unmarshal`]: encode a private scalar back into the
/// little-endian 32-byte wire form.
pub fn prv_marshal(prv: &BigUint) -> Result<[u8; 32]> {
    let be = int_to_bytes(prv, 32)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&be);
    out.reverse();
    Ok(out)
}

/// External 128-byte public-key wire form: `reverse(int_to_bytes(y, 64) ||
/// int_to_bytes(x, 64))`. Note the swapped `(x, y)` component order
/// relative to natural reading, preserved exactly as this wire format
/// defines it. Not used by the envelope codec, which carries `x`/`y` as
/// separate DER INTEGERs instead.
pub fn pub_marshal(x: &BigUint, y: &BigUint) -> Result<[u8; 128]> {
    let mut buf = Vec::with_capacity(128);
    buf.extend(int_to_bytes(y, 64)?);
    buf.extend(int_to_bytes(x, 64)?);
    buf.reverse();
    let mut out = [0u8; 128];
    out.copy_from_slice(&buf);
    Ok(out)
}

/// Inverse of [`pub_marshal`]; returns `(x, y)`.
pub fn pub_unmarshal(buf: &[u8; 128]) -> (BigUint, BigUint) {
    let mut reversed = buf.to_vec();
    reversed.reverse();
    let y = bytes_to_int(&reversed[..64]);
    let x = bytes_to_int(&reversed[64..]);
    (x, y)
}

/// A private signing scalar in `[1, q-1]`, held as its canonical
/// little-endian wire form. Zeroized on drop so the raw scalar does not
/// linger in memory once the holder goes out of scope.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateScalar([u8; 32]);

impl PrivateScalar {
    /// Wrap a raw little-endian 32-byte scalar, as read from a key file.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Encode an in-range scalar (checked against `[1, q-1]` by curve
    /// arithmetic, not here) into its wire form.
    pub fn from_scalar(n: &BigUint) -> Result<Self> {
        Ok(Self(prv_marshal(n)?))
    }

    /// Sample a random 32-byte scalar from `rng`. Does not itself enforce
    /// `n < q`; `scalar_mul`'s own range checks catch the astronomically
    /// unlikely out-of-range draw.
    pub fn random<R: rand::RngCore + rand::CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Decode into the big-endian integer used by curve arithmetic.
    pub fn to_scalar(&self) -> BigUint {
        prv_unmarshal(&self.0)
    }

    /// Raw little-endian wire form, e.g. for writing to a key file.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}
