//! Encoding a file into a PNG container.
//!
//! # Container Layout
//!
//! ```text
//! +------------------+
//! | signature (8)    |  89 50 4E 47 0D 0A 1A 0A
//! +------------------+
//! | IHDR             |  1x1, 8-bit truecolour
//! +------------------+
//! | IDAT             |  zlib(00 FF FF FF): one white pixel
//! +------------------+
//! | fiLe             |  name_len ++ name ++ file bytes
//! +------------------+
//! | IEND             |  empty
//! +------------------+
//! ```
//!
//! The result is a valid PNG. Viewers ignore `fiLe` because it is ancillary.

use miniz_oxide::deflate::compress_to_vec_zlib;
use tracing::debug;

use crate::chunk::{write_chunk, write_chunk_parts, ChunkType, CHUNK_OVERHEAD};
use crate::error::Result;
use crate::format::{placeholder_scanline, ImageHeader, SIGNATURE};
use crate::payload::payload_len;

/// zlib level for the placeholder scanline.
const PLACEHOLDER_LEVEL: u8 = 6;

/// Embed `file_bytes` under `filename` in a new PNG container.
///
/// # Errors
/// `PayloadError::TooLarge` if the filename and contents exceed the 32-bit
/// chunk length. The check runs before any output is built.
///
/// # Example
/// ```
/// let png = pngwrap_core::encode("a.txt", b"hello").unwrap();
/// assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
/// ```
pub fn encode(filename: &str, file_bytes: &[u8]) -> Result<Vec<u8>> {
    let record_len = payload_len(filename.len(), file_bytes.len())? as usize;
    // payload_len bounds filename.len() by u32::MAX
    let name_len = (filename.len() as u32).to_be_bytes();

    let header = ImageHeader::placeholder().to_bytes();
    let pixels = compress_to_vec_zlib(&placeholder_scanline(), PLACEHOLDER_LEVEL);

    let total = SIGNATURE.len()
        + CHUNK_OVERHEAD * 4
        + header.len()
        + pixels.len()
        + record_len;
    let mut out = Vec::with_capacity(total);

    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, ChunkType::IHDR, &header)?;
    write_chunk(&mut out, ChunkType::IDAT, &pixels)?;
    write_chunk_parts(
        &mut out,
        ChunkType::FILE,
        &[&name_len[..], filename.as_bytes(), file_bytes],
    )?;
    write_chunk(&mut out, ChunkType::IEND, &[])?;

    debug!(
        filename,
        file_bytes = file_bytes.len(),
        container_bytes = out.len(),
        "encoded container"
    );
    debug_assert_eq!(out.len(), total);
    Ok(out)
}
