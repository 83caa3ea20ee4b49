//! pngwrap-core: embed arbitrary files inside valid PNG images
//!
//! An encoded container is a 1x1 PNG with one extra ancillary chunk (`fiLe`)
//! holding the original file name and bytes. Image viewers show a white pixel;
//! [`decode`] recovers the file byte-for-byte.
//!
//! # Architecture
//!
//! - `chunk`: chunk serialization, CRC, parsed chunk view
//! - `format`: signature, image header, placeholder pixel
//! - `reader`: bounded big-endian reads over untrusted input
//! - `scan`: forward chunk iteration and inspection
//! - `payload`: the embedded-file record
//! - `encoder` / `decoder`: the two entry points
//! - `metrics`: counters for CLI runs
//!
//! # Design Principles
//!
//! - **No panics**: malformed input is an expected, typed failure
//! - **Bounded reads**: declared lengths are checked before slicing
//! - **Pure**: encode and decode work on in-memory buffers and share no state
//!
//! # Example
//! ```
//! use pngwrap_core::{decode, encode};
//!
//! let png = encode("notes.txt", b"hello").unwrap();
//! let file = decode(&png).unwrap();
//! assert_eq!(file.name, "notes.txt");
//! assert_eq!(file.data, b"hello");
//! ```

pub mod chunk;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod metrics;
pub mod payload;
pub mod reader;
pub mod scan;

// Re-export commonly used types
pub use decoder::{decode, decode_with, read_container, DecodeOptions};
pub use encoder::encode;
pub use error::{Error, ErrorKind, Result};
pub use payload::EmbeddedFile;
