//! DER encode/decode of the `SignatureSequence` envelope.
//!
//! ```text
//! SignatureSequence  ::= SEQUENCE { params KeyDataSet, sign SignatureParams, meta FileMeta }
//! KeyDataSet         ::= SET { keyDataSequence KeyDataSequence }
//! KeyDataSequence    ::= SEQUENCE {
//!     text UTF8String, algo OCTET STRING,
//!     openKey SEQUENCE { x INTEGER, y INTEGER },
//!     cryptosystem SEQUENCE { p INTEGER },
//!     curve SEQUENCE { a INTEGER, b INTEGER },
//!     dots SEQUENCE { x INTEGER, y INTEGER },
//!     q INTEGER
//! }
//! SignatureParams ::= SEQUENCE { r INTEGER, s INTEGER }
//! FileMeta        ::= SEQUENCE { filesize INTEGER, filename UTF8String }
//! ```
//!
//! Field order is significant; `text`/`filename`/`filesize` are
//! informational only and are never consulted by verification.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::curve::AffinePoint;
use crate::der::{encode_integer, encode_octet_string, encode_sequence, encode_set, encode_utf8_string, Reader};
use crate::error::{GostError, Result};
use crate::signer::Signature;

/// Fixed `algo` field value: the sole identifier this format recognizes.
pub const ALGO: [u8; 4] = [0x80, 0x06, 0x07, 0x00];
/// Fixed informational `text` field.
pub const TEXT: &str = "gostSignKey";

/// A fully self-contained, immutable signed-file record: domain
/// parameters, the signer's public point, the signature, and file
/// metadata. Owns its integer components exclusively.
///
/// The domain parameters (`p`/`q`/`a`/`b`/`gx`/`gy`) are carried as raw
/// integers rather than a validated [`crate::curve::Curve`]: decoding an
/// envelope is a structural operation only, and a caller that needs the
/// parameters to form a curve is responsible for validating them (see
/// [`crate::file::verify_file`]).
#[derive(Debug, Clone)]
pub struct Envelope {
    pub p: BigUint,
    pub q: BigUint,
    pub a: BigUint,
    pub b: BigUint,
    pub gx: BigUint,
    pub gy: BigUint,
    pub pub_point: AffinePoint,
    pub signature: Signature,
    pub filesize: u64,
    pub filename: String,
}

impl Envelope {
    pub fn encode(&self) -> Vec<u8> {
        let open_key = encode_sequence(&[encode_integer(&self.pub_point.x), encode_integer(&self.pub_point.y)]);
        let cryptosystem = encode_sequence(&[encode_integer(&self.p)]);
        let curve_params = encode_sequence(&[encode_integer(&self.a), encode_integer(&self.b)]);
        let dots = encode_sequence(&[encode_integer(&self.gx), encode_integer(&self.gy)]);

        let key_data_sequence = encode_sequence(&[
            encode_utf8_string(TEXT),
            encode_octet_string(&ALGO),
            open_key,
            cryptosystem,
            curve_params,
            dots,
            encode_integer(&self.q),
        ]);
        let params = encode_set(&[key_data_sequence]);

        let sign = encode_sequence(&[encode_integer(&self.signature.r), encode_integer(&self.signature.s)]);

        let meta = encode_sequence(&[
            encode_integer(&BigUint::from(self.filesize)),
            encode_utf8_string(&self.filename),
        ]);

        encode_sequence(&[params, sign, meta])
    }

    pub fn decode(bytes: &[u8]) -> Result<Envelope> {
        let mut top = Reader::new(bytes);
        let mut outer = top.read_sequence()?;
        top.expect_exhausted()?;

        let mut params_set = outer.read_set()?;
        let mut key_data = params_set.read_sequence()?;

        let _text = key_data.read_utf8_string()?;
        let algo = key_data.read_octet_string()?;
        if algo != ALGO {
            return Err(GostError::BadEnvelope("wrong signature identifier"));
        }

        let mut open_key = key_data.read_sequence()?;
        let pub_x = open_key.read_integer()?;
        let pub_y = open_key.read_integer()?;
        open_key.expect_exhausted()?;

        let mut cryptosystem = key_data.read_sequence()?;
        let p = cryptosystem.read_integer()?;
        cryptosystem.expect_exhausted()?;

        let mut curve_params = key_data.read_sequence()?;
        let a = curve_params.read_integer()?;
        let b = curve_params.read_integer()?;
        curve_params.expect_exhausted()?;

        let mut dots = key_data.read_sequence()?;
        let gx = dots.read_integer()?;
        let gy = dots.read_integer()?;
        dots.expect_exhausted()?;

        let q = key_data.read_integer()?;
        key_data.expect_exhausted()?;

        let mut sign = outer.read_sequence()?;
        let r = sign.read_integer()?;
        let s = sign.read_integer()?;
        sign.expect_exhausted()?;

        let mut meta = outer.read_sequence()?;
        let filesize = meta.read_integer()?;
        let filename = meta.read_utf8_string()?;
        meta.expect_exhausted()?;
        outer.expect_exhausted()?;

        let filesize: u64 = filesize
            .to_u64()
            .ok_or(GostError::BadEnvelope("filesize does not fit in u64"))?;

        Ok(Envelope {
            p,
            q,
            a,
            b,
            gx,
            gy,
            pub_point: AffinePoint::new(pub_x, pub_y),
            signature: Signature { r, s },
            filesize,
            filename,
        })
    }
}
