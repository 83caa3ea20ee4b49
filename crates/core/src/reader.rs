//! Bounded byte reader for parsing untrusted containers.
//!
//! Every read checks the remaining length first and returns `None` instead of
//! slicing past the end, so the caller decides which error a short read maps to.
//!
//! # Example
//! ```
//! use pngwrap_core::reader::ByteReader;
//!
//! let bytes = [0, 0, 0, 5, b'h', b'e', b'l', b'l', b'o'];
//! let mut reader = ByteReader::new(&bytes);
//! let len = reader.read_u32_be().unwrap();
//! assert_eq!(reader.read_slice(len as usize), Some(&b"hello"[..]));
//! assert!(reader.is_empty());
//! ```

/// Reads big-endian fields from a byte slice.
///
/// # Invariants
/// - `position` never exceeds `data.len()`
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Start reading at `position`, clamped to the end of `data`.
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position: position.min(data.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `len` bytes without copying.
    pub fn read_slice(&mut self, len: usize) -> Option<&'a [u8]> {
        if len > self.remaining() {
            return None;
        }
        let start = self.position;
        self.position += len;
        Some(&self.data[start..self.position])
    }

    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let slice = self.read_slice(N)?;
        slice.try_into().ok()
    }

    pub fn read_u32_be(&mut self) -> Option<u32> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    /// Everything not yet read.
    pub fn rest(&mut self) -> &'a [u8] {
        let start = self.position;
        self.position = self.data.len();
        &self.data[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance() {
        let bytes = [0xde, 0xad, 0xbe, 0xef, 1, 2, 3];
        let mut r = ByteReader::new(&bytes);

        assert_eq!(r.read_u32_be(), Some(0xdeadbeef));
        assert_eq!(r.position(), 4);
        assert_eq!(r.remaining(), 3);
        assert_eq!(r.read_array::<2>(), Some([1, 2]));
        assert_eq!(r.rest(), &[3]);
        assert!(r.is_empty());
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let bytes = [1, 2, 3];
        let mut r = ByteReader::new(&bytes);

        assert_eq!(r.read_u32_be(), None);
        assert_eq!(r.position(), 0);
        assert_eq!(r.read_slice(usize::MAX), None);
        assert_eq!(r.read_slice(3), Some(&bytes[..]));
    }

    #[test]
    fn test_at_clamps() {
        let bytes = [0u8; 4];
        let r = ByteReader::at(&bytes, 100);
        assert_eq!(r.position(), 4);
        assert!(r.is_empty());
    }

    #[test]
    fn test_zero_length_read() {
        let empty: [u8; 0] = [];
        let mut r = ByteReader::new(&empty);
        assert_eq!(r.read_slice(0), Some(&[][..]));
        assert_eq!(r.read_array::<0>(), Some([]));
    }
}
