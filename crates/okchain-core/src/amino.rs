//! Amino binary encoding.
//!
//! Amino's binary form is proto3-compatible: each field is a tag
//! `(field_number << 3) | wire_type`, followed by a uvarint or a
//! length-delimited payload. Zero and empty values are omitted. Repeated
//! struct fields repeat the tag once per element.
//!
//! Interface values (messages, public keys) are prefixed with 4 bytes
//! derived from their registered name, see [`prefix`].

use sha2::{Digest, Sha256};

use crate::error::OkchainError;

/// Wire type constants
pub mod wire_type {
    pub const VARINT: u8 = 0;
    pub const LENGTH_DELIMITED: u8 = 2;
}

/// Compute the 4-byte registered-type prefix for `name`.
///
/// `sha256(name)`, drop leading zero bytes, drop the 3 disambiguation
/// bytes, drop leading zero bytes again, take the next 4.
pub fn prefix(name: &str) -> [u8; 4] {
    let hash = Sha256::digest(name.as_bytes());
    let mut bytes = hash.iter().copied().skip_while(|b| *b == 0).skip(3).skip_while(|b| *b == 0);
    let mut out = [0u8; 4];
    for slot in &mut out {
        // 32-byte digests always leave at least 4 bytes after the skips
        *slot = bytes.next().unwrap_or(0);
    }
    out
}

#[inline]
pub fn encode_uvarint(buf: &mut Vec<u8>, value: u64) {
    let mut v = value;
    while v >= 0x80 {
        buf.push((v as u8) | 0x80);
        v >>= 7;
    }
    buf.push(v as u8);
}

#[inline]
pub fn encode_tag(buf: &mut Vec<u8>, field_number: u32, wire_type: u8) {
    encode_uvarint(buf, ((field_number as u64) << 3) | (wire_type as u64));
}

/// Encode a uvarint field. Skipped when zero.
#[inline]
pub fn encode_uvarint_field(buf: &mut Vec<u8>, field_number: u32, value: u64) {
    if value == 0 {
        return;
    }
    encode_tag(buf, field_number, wire_type::VARINT);
    encode_uvarint(buf, value);
}

/// Encode a boolean field. Skipped when false.
#[inline]
pub fn encode_bool(buf: &mut Vec<u8>, field_number: u32, value: bool) {
    if !value {
        return;
    }
    encode_tag(buf, field_number, wire_type::VARINT);
    buf.push(1);
}

/// Encode a string field. Skipped when empty.
#[inline]
pub fn encode_string(buf: &mut Vec<u8>, field_number: u32, value: &str) {
    encode_bytes(buf, field_number, value.as_bytes());
}

/// Encode a bytes field. Skipped when empty.
#[inline]
pub fn encode_bytes(buf: &mut Vec<u8>, field_number: u32, value: &[u8]) {
    if value.is_empty() {
        return;
    }
    encode_tag(buf, field_number, wire_type::LENGTH_DELIMITED);
    encode_uvarint(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

/// Encode an embedded struct. Always written, even when its body is empty,
/// so that repeated elements keep their positions.
#[inline]
pub fn encode_struct(buf: &mut Vec<u8>, field_number: u32, body: &[u8]) {
    encode_tag(buf, field_number, wire_type::LENGTH_DELIMITED);
    encode_uvarint(buf, body.len() as u64);
    buf.extend_from_slice(body);
}

/// Prepend the uvarint length of `body`.
pub fn length_prefixed(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 10);
    encode_uvarint(&mut out, body.len() as u64);
    out.extend_from_slice(body);
    out
}

/// Read a uvarint from the front of `data`, returning it and the bytes consumed.
pub fn read_uvarint(data: &[u8]) -> Result<(u64, usize), OkchainError> {
    let mut value: u64 = 0;
    for (i, byte) in data.iter().enumerate().take(10) {
        value |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(OkchainError::Decode("truncated or oversized uvarint".into()))
}

/// A decoded top-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<'a> {
    Varint(u64),
    Bytes(&'a [u8]),
}

impl<'a> Field<'a> {
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Field::Bytes(b) => Some(b),
            Field::Varint(_) => None,
        }
    }

    pub fn as_varint(&self) -> Option<u64> {
        match self {
            Field::Varint(v) => Some(*v),
            Field::Bytes(_) => None,
        }
    }
}

/// Split an encoded struct body into `(field_number, value)` pairs in order.
pub fn split_fields(mut data: &[u8]) -> Result<Vec<(u32, Field<'_>)>, OkchainError> {
    let mut fields = Vec::new();
    while !data.is_empty() {
        let (tag, n) = read_uvarint(data)?;
        data = &data[n..];
        let field_number = u32::try_from(tag >> 3)
            .map_err(|_| OkchainError::Decode(format!("field number overflow in tag {tag}")))?;
        match (tag & 0x07) as u8 {
            wire_type::VARINT => {
                let (v, n) = read_uvarint(data)?;
                data = &data[n..];
                fields.push((field_number, Field::Varint(v)));
            }
            wire_type::LENGTH_DELIMITED => {
                let (len, n) = read_uvarint(data)?;
                data = &data[n..];
                let len = usize::try_from(len)
                    .ok()
                    .filter(|l| *l <= data.len())
                    .ok_or_else(|| OkchainError::Decode("length exceeds buffer".into()))?;
                fields.push((field_number, Field::Bytes(&data[..len])));
                data = &data[len..];
            }
            other => {
                return Err(OkchainError::Decode(format!("unsupported wire type {other}")));
            }
        }
    }
    Ok(fields)
}
