//! Forward chunk scanning over an in-memory container.
//!
//! [`ChunkIter`] walks the stream after the signature one chunk at a time.
//! Declared lengths are checked against the bytes that actually remain before
//! anything is sliced; a short stream ends the iteration with a single error
//! describing exactly which field ran out.
//!
//! Iteration stops after `IEND`. Bytes after the terminator are never read.

use crate::chunk::{Chunk, ChunkType, CHUNK_OVERHEAD};
use crate::error::{ChunkError, Error, Result};
use crate::format::{has_signature, SIGNATURE};
use crate::reader::ByteReader;

/// Size of the length and type fields.
const CHUNK_HEADER_LEN: usize = 8;

/// Iterator over the chunks of a container.
///
/// Yields `Err` at most once, then fuses.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    reader: ByteReader<'a>,
    done: bool,
}

impl<'a> ChunkIter<'a> {
    /// Start scanning `container` after its signature.
    ///
    /// # Errors
    /// `Error::InvalidSignature` if the first 8 bytes are not the PNG signature.
    pub fn new(container: &'a [u8]) -> Result<Self> {
        if !has_signature(container) {
            return Err(Error::InvalidSignature {
                len: container.len(),
            });
        }
        Ok(Self {
            reader: ByteReader::at(container, SIGNATURE.len()),
            done: false,
        })
    }

    /// Offset of the next chunk to be read.
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    fn fail(&mut self, err: ChunkError) -> Option<Result<Chunk<'a>>> {
        self.done = true;
        Some(Err(err.into()))
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.reader.is_empty() {
            return None;
        }

        let offset = self.reader.position();
        let available = self.reader.remaining();

        let (Some(length), Some(tag)) = (self.reader.read_u32_be(), self.reader.read_array::<4>())
        else {
            return self.fail(ChunkError::MalformedHeader {
                offset,
                required: CHUNK_HEADER_LEN,
                available,
            });
        };
        let chunk_type = ChunkType(tag);

        let Some(data) = self.reader.read_slice(length as usize) else {
            return self.fail(ChunkError::TruncatedData {
                offset,
                chunk_type: chunk_type.to_string(),
                declared: length,
                available: self.reader.remaining(),
            });
        };

        let Some(crc) = self.reader.read_u32_be() else {
            return self.fail(ChunkError::MalformedHeader {
                offset,
                required: CHUNK_OVERHEAD + data.len(),
                available,
            });
        };

        if chunk_type == ChunkType::IEND {
            self.done = true;
        }

        Some(Ok(Chunk {
            offset,
            chunk_type,
            data,
            crc,
        }))
    }
}

impl std::iter::FusedIterator for ChunkIter<'_> {}

/// One row of [`inspect`] output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    pub offset: usize,
    pub chunk_type: ChunkType,
    /// Data length, framing excluded
    pub length: usize,
    pub crc: u32,
    pub crc_ok: bool,
}

/// List every chunk of a container up to `IEND`.
///
/// CRC mismatches are reported per row; structural errors (bad signature,
/// truncation) fail the whole call.
pub fn inspect(container: &[u8]) -> Result<Vec<ChunkSummary>> {
    ChunkIter::new(container)?
        .map(|chunk| {
            let chunk = chunk?;
            Ok(ChunkSummary {
                offset: chunk.offset,
                chunk_type: chunk.chunk_type,
                length: chunk.data.len(),
                crc: chunk.crc,
                crc_ok: chunk.verify_crc().is_ok(),
            })
        })
        .collect()
}
