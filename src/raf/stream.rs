//! Cursor-tracking byte reader for RAF records
//!
//! Wraps any [`Read`] source and counts every consumed byte, so a failure can be
//! reported at the exact file offset where the layout broke. Reads are all or
//! nothing: a short read surfaces as [`RafError::StreamExhausted`], never as a
//! partially filled value.

use crate::{RafError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

/// Byte reader with an exact cursor.
#[derive(Debug)]
pub struct RafReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> RafReader<R> {
    /// Wrap a byte source positioned at the start of a RAF file.
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf).map_err(|e| self.fail(e, n, context))?;
        self.position += n as u64;
        Ok(buf)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(|e| self.fail(e, N, context))?;
        self.position += N as u64;
        Ok(buf)
    }

    /// Discard exactly `n` bytes.
    ///
    /// A short skip reports the offset where the skipped region starts, like every
    /// other read.
    pub fn skip(&mut self, n: usize, context: &'static str) -> Result<()> {
        let copied = {
            let mut limited = (&mut self.inner).take(n as u64);
            io::copy(&mut limited, &mut io::sink())
        }
        .map_err(|e| self.fail(e, n, context))?;
        if copied < n as u64 {
            return Err(RafError::StreamExhausted { offset: self.position, needed: n, context });
        }
        self.position += copied;
        Ok(())
    }

    /// Unsigned byte.
    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        let value = self.inner.read_u8().map_err(|e| self.fail(e, 1, context))?;
        self.position += 1;
        Ok(value)
    }

    /// Single byte from a group the format labels big-endian.
    ///
    /// One byte has no byte order; this exists so header reads mirror the documented layout.
    pub fn read_u8_be(&mut self, context: &'static str) -> Result<u8> {
        self.read_u8(context)
    }

    /// Signed byte.
    pub fn read_i8(&mut self, context: &'static str) -> Result<i8> {
        let value = self.inner.read_i8().map_err(|e| self.fail(e, 1, context))?;
        self.position += 1;
        Ok(value)
    }

    /// Little-endian `u16`.
    pub fn read_u16_le(&mut self, context: &'static str) -> Result<u16> {
        let value = self.inner.read_u16::<LittleEndian>().map_err(|e| self.fail(e, 2, context))?;
        self.position += 2;
        Ok(value)
    }

    /// Little-endian `i16`.
    pub fn read_i16_le(&mut self, context: &'static str) -> Result<i16> {
        let value = self.inner.read_i16::<LittleEndian>().map_err(|e| self.fail(e, 2, context))?;
        self.position += 2;
        Ok(value)
    }

    /// Little-endian `u32`.
    pub fn read_u32_le(&mut self, context: &'static str) -> Result<u32> {
        let value = self.inner.read_u32::<LittleEndian>().map_err(|e| self.fail(e, 4, context))?;
        self.position += 4;
        Ok(value)
    }

    /// Little-endian `i32`.
    pub fn read_i32_le(&mut self, context: &'static str) -> Result<i32> {
        let value = self.inner.read_i32::<LittleEndian>().map_err(|e| self.fail(e, 4, context))?;
        self.position += 4;
        Ok(value)
    }

    /// Little-endian IEEE-754 `f32`.
    pub fn read_f32_le(&mut self, context: &'static str) -> Result<f32> {
        let value = self.inner.read_f32::<LittleEndian>().map_err(|e| self.fail(e, 4, context))?;
        self.position += 4;
        Ok(value)
    }

    /// Read `n` single-byte characters and truncate at the first null.
    ///
    /// Each byte maps to the char with the same code point (0-255), so non-ASCII
    /// bytes pass through unchanged instead of being treated as UTF-8.
    pub fn read_fixed_string(&mut self, n: usize, context: &'static str) -> Result<String> {
        let bytes = self.read_bytes(n, context)?;
        Ok(decode_fixed_string(&bytes))
    }

    fn fail(&self, err: io::Error, needed: usize, context: &'static str) -> RafError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            RafError::StreamExhausted { offset: self.position, needed, context }
        } else {
            RafError::Io { offset: self.position, source: err }
        }
    }
}

/// Null-truncated, byte-per-char decoding of a fixed-width field.
pub fn decode_fixed_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes[..end].iter().map(|&b| char::from(b)).collect()
}
