//! Recovering an embedded file from a PNG container.
//!
//! The decoder checks the signature, then walks chunks forward until the first
//! `fiLe` chunk. Chunks before it are only inspected for framing and CRC; their
//! contents are never interpreted, so the decoder accepts any PNG another tool
//! produced as long as the payload chunk survived.

use std::io::Read;

use tracing::debug;

use crate::chunk::ChunkType;
use crate::error::{Error, Result};
use crate::payload::{parse_payload, EmbeddedFile};
use crate::scan::ChunkIter;

/// Decoder behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Recompute and compare the CRC of every chunk scanned. When off, CRC
    /// bytes are skipped unread.
    pub verify_crc: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { verify_crc: true }
    }
}

impl DecodeOptions {
    /// Skip CRC checks. Corruption inside the payload then goes undetected.
    pub fn lenient() -> Self {
        Self { verify_crc: false }
    }
}

/// Extract the embedded file with default options (CRC verified).
///
/// # Errors
/// - `Error::InvalidSignature` if the buffer is not a PNG stream
/// - `ChunkError::MalformedHeader` / `ChunkError::TruncatedData` if the
///   stream ends inside a chunk before the payload is found
/// - `ChunkError::Corrupt` on a CRC mismatch
/// - `PayloadError` if the payload record is malformed
/// - `Error::PayloadNotFound` if the stream ends without a payload chunk
pub fn decode(container: &[u8]) -> Result<EmbeddedFile> {
    decode_with(container, &DecodeOptions::default())
}

/// Extract the embedded file.
pub fn decode_with(container: &[u8], options: &DecodeOptions) -> Result<EmbeddedFile> {
    for chunk in ChunkIter::new(container)? {
        let chunk = chunk?;
        if options.verify_crc {
            chunk.verify_crc()?;
        }

        if chunk.chunk_type != ChunkType::FILE {
            debug!(
                offset = chunk.offset,
                chunk_type = %chunk.chunk_type,
                len = chunk.data.len(),
                "skipping chunk"
            );
            continue;
        }

        let (name, data) = parse_payload(chunk.data)?;
        debug!(
            offset = chunk.offset,
            name = %name,
            file_bytes = data.len(),
            "found payload chunk"
        );
        return Ok(EmbeddedFile {
            name,
            data: data.to_vec(),
        });
    }

    Err(Error::PayloadNotFound)
}

/// Read a whole container from `reader`.
///
/// # Errors
/// `Error::Io` if the read fails.
pub fn read_container<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut container = Vec::new();
    reader.read_to_end(&mut container)?;
    debug!(bytes = container.len(), "read container");
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::build_chunk;
    use crate::encoder::encode;
    use crate::error::ErrorKind;
    use crate::format::SIGNATURE;
    use crate::payload::encode_payload;

    #[test]
    fn test_concrete_round_trip() {
        let png = encode("a.txt", b"hello").unwrap();
        let file = decode(&png).unwrap();
        assert_eq!(file, EmbeddedFile::new("a.txt", b"hello".to_vec()));
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(decode(b"").unwrap_err().kind(), ErrorKind::InvalidSignature);
    }

    #[test]
    fn test_signature_only() {
        assert_eq!(
            decode(&SIGNATURE).unwrap_err().kind(),
            ErrorKind::PayloadNotFound
        );
    }

    #[test]
    fn test_plain_png_has_no_payload() {
        let mut png = SIGNATURE.to_vec();
        png.extend(build_chunk(ChunkType::IHDR, &[0; 13]).unwrap());
        png.extend(build_chunk(ChunkType::IEND, &[]).unwrap());
        assert_eq!(decode(&png).unwrap_err().kind(), ErrorKind::PayloadNotFound);
    }

    #[test]
    fn test_first_payload_wins() {
        let mut png = SIGNATURE.to_vec();
        png.extend(build_chunk(ChunkType::FILE, &encode_payload("first", b"1").unwrap()).unwrap());
        png.extend(build_chunk(ChunkType::FILE, &encode_payload("second", b"2").unwrap()).unwrap());
        png.extend(build_chunk(ChunkType::IEND, &[]).unwrap());

        let file = decode(&png).unwrap();
        assert_eq!(file.name, "first");
        assert_eq!(file.data, b"1");
    }

    #[test]
    fn test_payload_after_iend_is_ignored() {
        let mut png = SIGNATURE.to_vec();
        png.extend(build_chunk(ChunkType::IEND, &[]).unwrap());
        png.extend(build_chunk(ChunkType::FILE, &encode_payload("late", b"x").unwrap()).unwrap());
        assert_eq!(decode(&png).unwrap_err().kind(), ErrorKind::PayloadNotFound);
    }

    #[test]
    fn test_corrupt_payload_detected() {
        let mut png = encode("a.txt", b"hello").unwrap();
        // last byte of "hello", just before the fiLe CRC and the 12-byte IEND
        let idx = png.len() - 12 - 4 - 1;
        png[idx] ^= 0x20;

        assert_eq!(decode(&png).unwrap_err().kind(), ErrorKind::CorruptChunk);

        let lenient = decode_with(&png, &DecodeOptions::lenient()).unwrap();
        assert_eq!(lenient.data, b"hellO");
    }

    #[test]
    fn test_corrupt_earlier_chunk_detected() {
        let mut png = encode("a.txt", b"hello").unwrap();
        // IHDR width byte
        png[16] = 0xff;
        assert_eq!(decode(&png).unwrap_err().kind(), ErrorKind::CorruptChunk);
        assert!(decode_with(&png, &DecodeOptions::lenient()).is_ok());
    }

    #[test]
    fn test_malformed_payload() {
        let mut png = SIGNATURE.to_vec();
        png.extend(build_chunk(ChunkType::FILE, &[0, 0]).unwrap());
        assert_eq!(decode(&png).unwrap_err().kind(), ErrorKind::MalformedPayload);

        let mut png = SIGNATURE.to_vec();
        png.extend(build_chunk(ChunkType::FILE, &[0, 0, 0, 9, b'a']).unwrap());
        assert_eq!(decode(&png).unwrap_err().kind(), ErrorKind::MalformedPayload);
    }

    struct DeniedReader;

    impl Read for DeniedReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_read_container() {
        let png = encode("a.txt", b"hello").unwrap();
        let read = read_container(std::io::Cursor::new(png.clone())).unwrap();
        assert_eq!(read, png);
        assert_eq!(decode(&read).unwrap().data, b"hello");
    }

    #[test]
    fn test_read_container_failure_is_io() {
        let err = read_container(DeniedReader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("denied"));
    }
}
