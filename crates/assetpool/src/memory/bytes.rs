//! Bounds-checked little-endian extraction from raw slot bytes.

use crate::error::{Error, Result};

/// Read-only view over a slot's raw bytes.
///
/// Every accessor takes an absolute offset into the buffer and fails with
/// [`Error::FieldOutOfBounds`] instead of reading past the end.
#[derive(Debug, Clone, Copy)]
pub struct ByteBuffer<'a> {
    data: &'a [u8],
}

impl<'a> ByteBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Borrow `width` bytes starting at `offset`
    fn slice(&self, offset: usize, width: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(width)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(Error::FieldOutOfBounds {
                offset,
                width,
                len: self.data.len(),
            })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let bytes = self.slice(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_i32(&self, offset: usize) -> Result<i32> {
        self.array(offset).map(i32::from_le_bytes)
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        self.array(offset).map(u32::from_le_bytes)
    }

    pub fn read_i64(&self, offset: usize) -> Result<i64> {
        self.array(offset).map(i64::from_le_bytes)
    }

    pub fn read_u64(&self, offset: usize) -> Result<u64> {
        self.array(offset).map(u64::from_le_bytes)
    }

    pub fn read_f32(&self, offset: usize) -> Result<f32> {
        self.array(offset).map(f32::from_le_bytes)
    }
}
