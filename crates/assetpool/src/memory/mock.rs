//! In-memory address space for tests.
//!
//! Addresses that were never written are unmapped: reads that touch them fail
//! the same way a read of a freed page in a live process would.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

#[derive(Debug, Clone, Default)]
pub struct MockMemoryReader {
    bytes: BTreeMap<u64, u8>,
}

impl MockMemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite (or map) bytes at `address`
    pub fn write(&mut self, address: u64, data: &[u8]) {
        for (i, b) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, *b);
        }
    }

    pub fn write_u64(&mut self, address: u64, value: u64) {
        self.write(address, &value.to_le_bytes());
    }

    /// Write a string followed by a NUL terminator
    pub fn write_cstring(&mut self, address: u64, value: &str) {
        self.write(address, value.as_bytes());
        self.write(address + value.len() as u64, &[0]);
    }

    /// Unmap `len` bytes starting at `address`
    pub fn unmap(&mut self, address: u64, len: usize) {
        for i in 0..len as u64 {
            self.bytes.remove(&(address + i));
        }
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(size.min(0x1000));
        for i in 0..size as u64 {
            let addr = address
                .checked_add(i)
                .ok_or_else(|| Error::read_failed(address, "address overflow"))?;
            match self.bytes.get(&addr) {
                Some(b) => out.push(*b),
                None => {
                    return Err(Error::read_failed(
                        address,
                        format!("unmapped byte at {:#x}", addr),
                    ));
                }
            }
        }
        Ok(out)
    }
}

/// Builder for [`MockMemoryReader`]
#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    reader: MockMemoryReader,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(mut self, address: u64, data: impl AsRef<[u8]>) -> Self {
        self.reader.write(address, data.as_ref());
        self
    }

    /// Map `len` zero bytes
    pub fn with_zeroed(self, address: u64, len: usize) -> Self {
        self.with_bytes(address, vec![0u8; len])
    }

    pub fn with_u64(self, address: u64, value: u64) -> Self {
        self.with_bytes(address, value.to_le_bytes())
    }

    pub fn with_u32(self, address: u64, value: u32) -> Self {
        self.with_bytes(address, value.to_le_bytes())
    }

    pub fn with_i32(self, address: u64, value: i32) -> Self {
        self.with_bytes(address, value.to_le_bytes())
    }

    pub fn with_f32(self, address: u64, value: f32) -> Self {
        self.with_bytes(address, value.to_le_bytes())
    }

    pub fn with_cstring(mut self, address: u64, value: &str) -> Self {
        self.reader.write_cstring(address, value);
        self
    }

    pub fn build(self) -> MockMemoryReader {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmapped_read_fails() {
        let reader = MockMemoryBuilder::new().with_zeroed(0x100, 4).build();
        assert!(reader.read_bytes(0x100, 4).is_ok());
        assert!(reader.read_bytes(0x100, 5).is_err());
        assert!(reader.read_bytes(0x0, 1).is_err());
    }

    #[test]
    fn test_write_and_unmap() {
        let mut reader = MockMemoryBuilder::new().with_u64(0x200, 1).build();
        reader.write_u64(0x200, 2);
        assert_eq!(reader.read_u64(0x200).unwrap(), 2);

        reader.unmap(0x200, 8);
        assert!(reader.read_u64(0x200).is_err());
    }
}
