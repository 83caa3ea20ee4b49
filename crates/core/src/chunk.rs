//! Chunk serialization and the parsed chunk view.
//!
//! A chunk is the unit of structure in a PNG stream:
//!
//! ```text
//! +------------------+
//! | length (4)       |  u32 big-endian, count of data bytes
//! +------------------+
//! | type (4)         |  ASCII letters, e.g. "IHDR"
//! +------------------+
//! | data             |  `length` bytes
//! | (variable)       |
//! +------------------+
//! | crc32 (4)        |  u32 big-endian
//! +------------------+
//! ```
//!
//! # CRC Coverage
//!
//! The CRC-32 (IEEE 802.3 polynomial) covers the type and data fields, never
//! the length. It is always recomputed from the bytes being written.

use std::fmt;

use crate::error::{ChunkError, Error, Result};

/// Bytes of framing around chunk data: length, type and CRC.
pub const CHUNK_OVERHEAD: usize = 12;

/// A 4-byte chunk type tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header.
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    /// Image data.
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    /// Image trailer.
    pub const IEND: ChunkType = ChunkType(*b"IEND");
    /// Embedded file payload. Ancillary, private, safe-to-copy.
    pub const FILE: ChunkType = ChunkType(*b"fiLe");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Lowercase first letter: decoders may ignore the chunk.
    pub fn is_ancillary(&self) -> bool {
        self.0[0] & 0x20 != 0
    }

    pub fn is_critical(&self) -> bool {
        !self.is_ancillary()
    }

    /// Lowercase second letter.
    pub fn is_private(&self) -> bool {
        self.0[1] & 0x20 != 0
    }

    /// Lowercase fourth letter: editors may copy the chunk unchanged.
    pub fn is_safe_to_copy(&self) -> bool {
        self.0[3] & 0x20 != 0
    }
}

impl TryFrom<&[u8]> for ChunkType {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let tag: [u8; 4] = bytes
            .try_into()
            .map_err(|_| ChunkError::InvalidType(bytes.to_vec()))?;
        if !tag.iter().all(u8::is_ascii_alphabetic) {
            return Err(ChunkError::InvalidType(bytes.to_vec()).into());
        }
        Ok(ChunkType(tag))
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

/// CRC-32 over `type ++ data`.
pub fn chunk_crc(chunk_type: ChunkType, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&chunk_type.0);
    hasher.update(data);
    hasher.finalize()
}

/// Serialize one chunk into a new buffer.
///
/// # Errors
/// `ChunkError::TooLarge` if `data` does not fit a u32 length.
pub fn build_chunk(chunk_type: ChunkType, data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(CHUNK_OVERHEAD + data.len());
    write_chunk(&mut out, chunk_type, data)?;
    Ok(out)
}

/// Append one serialized chunk to `out`.
///
/// Nothing is written when the length check fails.
pub fn write_chunk(out: &mut Vec<u8>, chunk_type: ChunkType, data: &[u8]) -> Result<()> {
    write_chunk_parts(out, chunk_type, &[data])
}

/// Append one chunk whose data is the concatenation of `parts`, without
/// joining them first.
///
/// Nothing is written when the length check fails.
pub fn write_chunk_parts(out: &mut Vec<u8>, chunk_type: ChunkType, parts: &[&[u8]]) -> Result<()> {
    let len: usize = parts.iter().map(|p| p.len()).sum();
    let length = u32::try_from(len).map_err(|_| ChunkError::TooLarge { len })?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&chunk_type.0);
    for part in parts {
        hasher.update(part);
    }
    let crc = hasher.finalize();

    out.reserve(CHUNK_OVERHEAD + len);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&chunk_type.0);
    for part in parts {
        out.extend_from_slice(part);
    }
    out.extend_from_slice(&crc.to_be_bytes());
    Ok(())
}

/// A chunk parsed out of a container, borrowing its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Offset of the length field within the container
    pub offset: usize,

    pub chunk_type: ChunkType,

    pub data: &'a [u8],

    /// CRC as stored in the stream
    pub crc: u32,
}

impl<'a> Chunk<'a> {
    pub fn computed_crc(&self) -> u32 {
        chunk_crc(self.chunk_type, self.data)
    }

    /// Compare the stored CRC with a fresh one.
    ///
    /// # Errors
    /// `ChunkError::Corrupt` on mismatch.
    pub fn verify_crc(&self) -> Result<()> {
        let actual = self.computed_crc();
        if actual != self.crc {
            return Err(ChunkError::Corrupt {
                offset: self.offset,
                chunk_type: self.chunk_type.to_string(),
                expected: self.crc,
                actual,
            }
            .into());
        }
        Ok(())
    }

    /// Size of the chunk in the stream, framing included.
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.data.len()
    }
}
