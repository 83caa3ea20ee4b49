//! The embedded-file record carried in the `fiLe` chunk.
//!
//! ```text
//! +----------------------+
//! | name_len (4)         |  u32 big-endian
//! +----------------------+
//! | name                 |  UTF-8, name_len bytes
//! +----------------------+
//! | file bytes           |  remainder of the chunk, stored raw
//! +----------------------+
//! ```

use crate::error::{PayloadError, Result};
use crate::reader::ByteReader;

/// Size of the filename length prefix.
pub const NAME_LEN_PREFIX: usize = 4;

/// A file recovered from (or destined for) a container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmbeddedFile {
    /// Original file name. Invalid UTF-8 in a crafted container is replaced
    /// with U+FFFD.
    pub name: String,

    /// Original file contents
    pub data: Vec<u8>,
}

impl EmbeddedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Length of the payload record for a name and content size.
///
/// # Errors
/// `PayloadError::TooLarge` if the record would not fit a u32 chunk length.
pub fn payload_len(name_len: usize, data_len: usize) -> Result<u32> {
    let total = (NAME_LEN_PREFIX as u64)
        .saturating_add(name_len as u64)
        .saturating_add(data_len as u64);
    u32::try_from(total).map_err(|_| PayloadError::TooLarge { len: total }.into())
}

/// Serialize the payload record.
pub fn encode_payload(name: &str, data: &[u8]) -> Result<Vec<u8>> {
    let total = payload_len(name.len(), data.len())?;
    // payload_len bounds name.len() by u32::MAX
    let name_len = name.len() as u32;

    let mut out = Vec::with_capacity(total as usize);
    out.extend_from_slice(&name_len.to_be_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(data);
    Ok(out)
}

/// Parse a payload record, borrowing the file bytes.
///
/// # Errors
/// - `PayloadError::MissingNameLength` if fewer than 4 bytes are present
/// - `PayloadError::NameOverrun` if the name runs past the end of the record
pub fn parse_payload(data: &[u8]) -> Result<(String, &[u8])> {
    let mut reader = ByteReader::new(data);

    let name_len = reader
        .read_u32_be()
        .ok_or(PayloadError::MissingNameLength { len: data.len() })?;
    let available = reader.remaining();
    let name_bytes = reader
        .read_slice(name_len as usize)
        .ok_or(PayloadError::NameOverrun {
            declared: name_len,
            available,
        })?;

    let name = String::from_utf8_lossy(name_bytes).into_owned();
    Ok((name, reader.rest()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_layout() {
        let bytes = encode_payload("a.txt", b"hello").unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 5]);
        assert_eq!(&bytes[4..9], b"a.txt");
        assert_eq!(&bytes[9..], b"hello");
    }

    #[test]
    fn test_parse() {
        let bytes = encode_payload("ñandú.bin", &[0, 1, 2]).unwrap();
        let (name, data) = parse_payload(&bytes).unwrap();
        assert_eq!(name, "ñandú.bin");
        assert_eq!(data, &[0, 1, 2]);
    }

    #[test]
    fn test_empty_name_and_data() {
        let bytes = encode_payload("", b"").unwrap();
        assert_eq!(bytes, [0, 0, 0, 0]);
        let (name, data) = parse_payload(&bytes).unwrap();
        assert!(name.is_empty());
        assert!(data.is_empty());
    }

    #[test]
    fn test_missing_prefix() {
        for len in 0..NAME_LEN_PREFIX {
            let err = parse_payload(&vec![0u8; len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedPayload);
        }
    }

    #[test]
    fn test_name_overrun() {
        let mut bytes = 10u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        let err = parse_payload(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
    }

    #[test]
    fn test_name_exactly_fills_record() {
        let mut bytes = 4u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(b"name");
        let (name, data) = parse_payload(&bytes).unwrap();
        assert_eq!(name, "name");
        assert!(data.is_empty());
    }

    #[test]
    fn test_invalid_utf8_name_is_replaced() {
        let mut bytes = 3u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[b'a', 0xff, b'b']);
        bytes.extend_from_slice(b"body");
        let (name, data) = parse_payload(&bytes).unwrap();
        assert_eq!(name, "a\u{FFFD}b");
        assert_eq!(data, b"body");
    }

    #[test]
    fn test_payload_len_limit() {
        assert_eq!(payload_len(5, 5).unwrap(), 14);
        assert_eq!(payload_len(0, u32::MAX as usize - 4).unwrap(), u32::MAX);

        let err = payload_len(1, u32::MAX as usize - 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
    }
}
