//! Error types for the pngwrap container format.
//!
//! All operations return structured errors rather than panicking. Malformed
//! containers are expected input (they come straight from users), so every
//! failure mode has its own variant and a stable [`ErrorKind`].

use thiserror::Error;

/// Top-level error type for all container operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Signature: the buffer is not a PNG stream at all
/// - Chunk: chunk framing, bounds, or CRC failures
/// - Payload: the embedded-file record is malformed or too large
/// - I/O: reading a container from a stream
#[derive(Debug, Error)]
pub enum Error {
    /// The first 8 bytes are not the PNG signature.
    #[error("invalid signature: not a PNG stream ({len} bytes)")]
    InvalidSignature { len: usize },

    /// Chunk framing or integrity error
    #[error("chunk error: {0}")]
    Chunk(#[from] ChunkError),

    /// Payload framing error
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// The scan reached the end of the stream without a payload chunk.
    #[error("no embedded file found")]
    PayloadNotFound,

    /// Reading a container failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chunk-level errors.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Fewer than 8 bytes remain for a length/type header, or fewer than 4
    /// for the trailing CRC.
    #[error("malformed chunk header at offset {offset}: need {required} bytes, got {available}")]
    MalformedHeader {
        offset: usize,
        required: usize,
        available: usize,
    },

    /// Declared data length runs past the end of the buffer.
    #[error("chunk {chunk_type} at offset {offset} declares {declared} bytes, only {available} remain")]
    TruncatedData {
        offset: usize,
        chunk_type: String,
        declared: u32,
        available: usize,
    },

    /// Stored CRC does not match the recomputed one.
    #[error("chunk {chunk_type} at offset {offset} is corrupt: stored crc {expected:#010x}, computed {actual:#010x}")]
    Corrupt {
        offset: usize,
        chunk_type: String,
        expected: u32,
        actual: u32,
    },

    /// Chunk type is not four ASCII letters.
    #[error("invalid chunk type: {0:?}")]
    InvalidType(Vec<u8>),

    /// Chunk data does not fit the 32-bit length field.
    #[error("chunk data of {len} bytes exceeds the 32-bit length field")]
    TooLarge { len: usize },
}

/// Payload record errors.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Payload data is shorter than the 4-byte filename length prefix.
    #[error("payload has {len} bytes, too short for the filename length prefix")]
    MissingNameLength { len: usize },

    /// Filename length points past the end of the payload data.
    #[error("filename length {declared} exceeds the {available} bytes after the prefix")]
    NameOverrun { declared: u32, available: usize },

    /// Filename plus file contents would overflow the 32-bit chunk length.
    #[error("payload of {len} bytes exceeds the 32-bit chunk length field")]
    TooLarge { len: u64 },
}

/// Flat classification of [`Error`], for callers that present diagnostics
/// without matching on nested enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSignature,
    MalformedChunkHeader,
    TruncatedChunkData,
    CorruptChunk,
    InvalidChunkType,
    ChunkTooLarge,
    MalformedPayload,
    PayloadNotFound,
    PayloadTooLarge,
    Io,
}

impl Error {
    /// Which condition failed.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSignature { .. } => ErrorKind::InvalidSignature,
            Error::Chunk(ChunkError::MalformedHeader { .. }) => ErrorKind::MalformedChunkHeader,
            Error::Chunk(ChunkError::TruncatedData { .. }) => ErrorKind::TruncatedChunkData,
            Error::Chunk(ChunkError::Corrupt { .. }) => ErrorKind::CorruptChunk,
            Error::Chunk(ChunkError::InvalidType(_)) => ErrorKind::InvalidChunkType,
            Error::Chunk(ChunkError::TooLarge { .. }) => ErrorKind::ChunkTooLarge,
            Error::Payload(PayloadError::TooLarge { .. }) => ErrorKind::PayloadTooLarge,
            Error::Payload(_) => ErrorKind::MalformedPayload,
            Error::PayloadNotFound => ErrorKind::PayloadNotFound,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
