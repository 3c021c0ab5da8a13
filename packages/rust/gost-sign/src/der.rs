//! A minimal DER (ITU-T X.690) encoder/decoder for the one fixed schema
//! the envelope needs: SEQUENCE, SET, INTEGER, OCTET STRING, UTF8String.
//!
//! This avoids dragging in a general ASN.1 dependency while keeping
//! bit-exact control over INTEGER minimal encoding, which is part of the
//! on-disk contract.

use num_bigint::BigUint;

use crate::error::{GostError, Result};

const TAG_INTEGER: u8 = 0x02;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_UTF8_STRING: u8 = 0x0C;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_SET: u8 = 0x31;

fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else {
        let mut body = Vec::new();
        let mut n = len;
        while n > 0 {
            body.insert(0, (n & 0xFF) as u8);
            n >>= 8;
        }
        let mut out = vec![0x80 | body.len() as u8];
        out.extend(body);
        out
    }
}

fn encode_tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(encode_length(value.len()));
    out.extend_from_slice(value);
    out
}

/// DER-minimal two's-complement encoding of a non-negative integer: a
/// leading `0x00` is prepended iff the top bit of the magnitude's first
/// byte would otherwise be set.
pub fn encode_integer(n: &BigUint) -> Vec<u8> {
    let mut bytes = n.to_bytes_be();
    if bytes.is_empty() {
        bytes.push(0);
    }
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0);
    }
    encode_tlv(TAG_INTEGER, &bytes)
}

pub fn encode_octet_string(data: &[u8]) -> Vec<u8> {
    encode_tlv(TAG_OCTET_STRING, data)
}

pub fn encode_utf8_string(s: &str) -> Vec<u8> {
    encode_tlv(TAG_UTF8_STRING, s.as_bytes())
}

pub fn encode_sequence(children: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = children.iter().flatten().copied().collect();
    encode_tlv(TAG_SEQUENCE, &body)
}

pub fn encode_set(children: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = children.iter().flatten().copied().collect();
    encode_tlv(TAG_SET, &body)
}

/// A cursor over a DER buffer. Every structural deviation from the
/// expected shape is rejected with [`GostError::BadEnvelope`].
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn read_u8(&mut self) -> Result<u8> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or(GostError::BadEnvelope("unexpected end of input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn read_length(&mut self) -> Result<usize> {
        let first = self.read_u8()?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        let n_bytes = (first & 0x7F) as usize;
        if n_bytes == 0 {
            return Err(GostError::BadEnvelope("indefinite length not supported"));
        }
        let mut len: usize = 0;
        for _ in 0..n_bytes {
            len = len
                .checked_shl(8)
                .ok_or(GostError::BadEnvelope("length overflow"))?
                | self.read_u8()? as usize;
        }
        Ok(len)
    }

    /// Read a TLV with the given expected tag, returning its value bytes.
    fn read_tlv(&mut self, expected_tag: u8) -> Result<&'a [u8]> {
        let tag = self.read_u8()?;
        if tag != expected_tag {
            return Err(GostError::BadEnvelope("unexpected DER tag"));
        }
        let len = self.read_length()?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .ok_or(GostError::BadEnvelope("length overflow"))?;
        if end > self.buf.len() {
            return Err(GostError::BadEnvelope("value runs past end of buffer"));
        }
        self.pos = end;
        Ok(&self.buf[start..end])
    }

    pub fn read_integer(&mut self) -> Result<BigUint> {
        let raw = self.read_tlv(TAG_INTEGER)?;
        if raw.is_empty() {
            return Err(GostError::BadEnvelope("empty INTEGER"));
        }
        if raw[0] & 0x80 != 0 {
            return Err(GostError::BadEnvelope("negative INTEGER not supported"));
        }
        Ok(BigUint::from_bytes_be(raw))
    }

    pub fn read_octet_string(&mut self) -> Result<Vec<u8>> {
        Ok(self.read_tlv(TAG_OCTET_STRING)?.to_vec())
    }

    pub fn read_utf8_string(&mut self) -> Result<String> {
        let raw = self.read_tlv(TAG_UTF8_STRING)?;
        String::from_utf8(raw.to_vec()).map_err(|_| GostError::BadEnvelope("invalid UTF8String"))
    }

    /// Enter a SEQUENCE, returning a reader scoped to its contents.
    pub fn read_sequence(&mut self) -> Result<Reader<'a>> {
        Ok(Reader::new(self.read_tlv(TAG_SEQUENCE)?))
    }

    /// Enter a SET, returning a reader scoped to its contents.
    pub fn read_set(&mut self) -> Result<Reader<'a>> {
        Ok(Reader::new(self.read_tlv(TAG_SET)?))
    }

    /// Fail if any bytes remain unconsumed in this reader's scope.
    pub fn expect_exhausted(&self) -> Result<()> {
        if self.pos != self.buf.len() {
            return Err(GostError::BadEnvelope("trailing bytes after expected structure"));
        }
        Ok(())
    }
}
