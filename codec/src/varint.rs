//! Byte-level VarInt primitives.
//!
//! Integers use unsigned LEB128: each byte carries 7 payload bits, low group
//! first, with the MSB set on every byte except the last. Values below 128
//! fit in a single byte.

use thiserror::Error;

/// Maximum bytes a u64 VarInt may occupy.
pub const MAX_VARINT_LEN: usize = 10;

/// Errors that can occur during deck-code encoding/decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Read past the end of the buffer.
    #[error("unexpected end of buffer at byte {offset}")]
    UnexpectedEof { offset: usize },

    /// VarInt value exceeds u64.
    #[error("VarInt overflow at byte {offset}")]
    VarIntOverflow { offset: usize },

    /// Decoded value does not fit the target integer width.
    #[error("value {value} out of range at byte {offset}")]
    ValueOutOfRange { value: u64, offset: usize },

    /// First byte of the payload is not the reserved zero.
    #[error("invalid deck code header byte {byte:#04x}")]
    InvalidHeader { byte: u8 },

    /// Format version other than the supported one.
    #[error("unsupported deck code version {version}, expected {expected}")]
    UnsupportedVersion { version: u64, expected: u64 },

    /// Card entry with a count of zero.
    #[error("card {dbf_id} has invalid count {count}")]
    InvalidCardCount { dbf_id: u32, count: u32 },

    /// Input string exceeds the accepted length.
    #[error("deck code is {len} characters, at most {max} allowed")]
    TooLong { len: usize, max: usize },

    /// Input is not standard Base64.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Append-only byte writer.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    /// Write an unsigned LEB128 VarInt.
    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        self.buffer.push((value & 0x7F) as u8);
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

/// Cursor over a byte slice. Every read is bounds-checked.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_byte(&mut self) -> CodecResult<u8> {
        let byte = *self
            .buffer
            .get(self.offset)
            .ok_or(CodecError::UnexpectedEof {
                offset: self.offset,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    /// Read an unsigned LEB128 VarInt.
    ///
    /// Running out of bytes while the continuation bit is set is an error,
    /// never an implicit zero.
    pub fn read_varint(&mut self) -> CodecResult<u64> {
        let start = self.offset;
        let mut value: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let byte = self.read_byte()?;
            let payload = (byte & 0x7F) as u64;

            if shift >= 64 || (shift == 63 && payload > 1) {
                return Err(CodecError::VarIntOverflow { offset: start });
            }

            value |= payload << shift;

            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Read a VarInt that must fit in a u32.
    pub fn read_varint_u32(&mut self) -> CodecResult<u32> {
        let offset = self.offset;
        let value = self.read_varint()?;
        u32::try_from(value).map_err(|_| CodecError::ValueOutOfRange { value, offset })
    }
}

/// Encode a value as VarInt bytes (standalone function).
#[must_use]
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(MAX_VARINT_LEN);
    writer.write_varint(value);
    writer.finish()
}

/// Decode a VarInt from the front of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn decode_varint(bytes: &[u8]) -> CodecResult<(u64, usize)> {
    let mut reader = ByteReader::new(bytes);
    let value = reader.read_varint()?;
    Ok((value, reader.offset()))
}
