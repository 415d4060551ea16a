use crate::error::{Error, Result};

/// Upper bound for null-terminated string reads
pub const MAX_CSTRING_LEN: usize = 4096;

/// Bytes fetched per step while scanning for a string terminator
const CSTRING_CHUNK: usize = 64;

/// A fixed-size structure that can be decoded from raw little-endian bytes
pub trait FromBytes: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Decode from at least `SIZE` bytes
    fn from_bytes(bytes: &[u8]) -> Option<Self>;
}

/// Read-only access to a target address space.
///
/// Every read may fail at any time: the target is a live process that is not
/// synchronized with the reader.
pub trait ReadMemory: Send + Sync {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    fn read_i32(&self, address: u64) -> Result<i32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        self.read_u32(address).map(f32::from_bits)
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        let bytes = self.read_bytes(address, 8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[..8]);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_i64(&self, address: u64) -> Result<i64> {
        self.read_u64(address).map(|v| v as i64)
    }

    /// Read a fixed-size structure
    fn read_struct<T: FromBytes>(&self, address: u64) -> Result<T>
    where
        Self: Sized,
    {
        let bytes = self.read_bytes(address, T::SIZE)?;
        T::from_bytes(&bytes)
            .ok_or_else(|| Error::read_failed(address, format!("short read of {} bytes", T::SIZE)))
    }

    /// Read a null-terminated string
    fn read_cstring(&self, address: u64) -> Result<String> {
        let mut out = Vec::new();
        let mut cursor = address;

        while out.len() < MAX_CSTRING_LEN {
            let chunk = match self.read_bytes(cursor, CSTRING_CHUNK) {
                Ok(chunk) => chunk,
                // The string may end right before an unmapped page
                Err(_) => self.read_bytes(cursor, 1)?,
            };

            if let Some(end) = memchr::memchr(0, &chunk) {
                out.extend_from_slice(&chunk[..end]);
                return Ok(String::from_utf8_lossy(&out).into_owned());
            }

            out.extend_from_slice(&chunk);
            cursor = cursor
                .checked_add(chunk.len() as u64)
                .ok_or_else(|| Error::read_failed(address, "string runs past the address space"))?;
        }

        Err(Error::read_failed(
            address,
            format!("no string terminator within {} bytes", MAX_CSTRING_LEN),
        ))
    }
}

impl<R: ReadMemory + ?Sized> ReadMemory for &R {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, size)
    }
}
