//! Fixed pieces of the container: signature, image header, placeholder pixel.

/// PNG signature.
pub const SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

/// Truecolour, no alpha.
pub const COLOR_TYPE_RGB: u8 = 2;

/// Filter byte prefixed to every scanline; 0 = None.
pub const FILTER_NONE: u8 = 0;

/// The single RGB pixel of the placeholder image (white).
pub const PLACEHOLDER_PIXEL: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// True when `bytes` starts with the PNG signature.
pub fn has_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&SIGNATURE)
}

/// IHDR chunk contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl ImageHeader {
    /// Serialized size of the IHDR data.
    pub const LEN: usize = 13;

    /// 1x1, 8-bit truecolour, deflate, adaptive filtering, no interlace.
    pub const fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            bit_depth: 8,
            color_type: COLOR_TYPE_RGB,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[0..4].copy_from_slice(&self.width.to_be_bytes());
        out[4..8].copy_from_slice(&self.height.to_be_bytes());
        out[8] = self.bit_depth;
        out[9] = self.color_type;
        out[10] = self.compression;
        out[11] = self.filter;
        out[12] = self.interlace;
        out
    }
}

/// The unfiltered scanline of the placeholder image.
pub fn placeholder_scanline() -> [u8; 4] {
    let [r, g, b] = PLACEHOLDER_PIXEL;
    [FILTER_NONE, r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_header_bytes() {
        assert_eq!(
            ImageHeader::placeholder().to_bytes(),
            [0, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 0]
        );
    }

    #[test]
    fn test_has_signature() {
        assert!(has_signature(&SIGNATURE));
        assert!(has_signature(b"\x89PNG\r\n\x1a\nmore"));
        assert!(!has_signature(b"\x89PNG"));
        assert!(!has_signature(b""));
    }
}
