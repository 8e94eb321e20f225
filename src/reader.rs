//! Byte cursor shared by every frame decoder.
//!
//! All short reads surface as [`Error::TruncatedFrame`] naming the structure
//! being parsed, which is what makes the truncation contract hold uniformly
//! across the current and legacy formats.

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take `n` bytes or fail with `TruncatedFrame(what)`.
    pub fn bytes(&mut self, n: usize, what: &'static str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::TruncatedFrame(what));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn u8(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.bytes(1, what)?[0])
    }

    pub fn u16_le(&mut self, what: &'static str) -> Result<u16> {
        let b = self.bytes(2, what)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u24_le(&mut self, what: &'static str) -> Result<u32> {
        let b = self.bytes(3, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], 0]))
    }

    pub fn u32_le(&mut self, what: &'static str) -> Result<u32> {
        let b = self.bytes(4, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Little-endian unsigned integer of `width` bytes (1, 2, 4 or 8).
    pub fn uint_le(&mut self, width: usize, what: &'static str) -> Result<u64> {
        let b = self.bytes(width, what)?;
        let mut out = 0u64;
        for (i, &byte) in b.iter().enumerate() {
            out |= (byte as u64) << (8 * i);
        }
        Ok(out)
    }
}
