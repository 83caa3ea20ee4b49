//! File-level operations: read, convert, write.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pngwrap_core::metrics::Metrics;
use pngwrap_core::scan::inspect;
use pngwrap_core::{decode_with, encode, read_container, DecodeOptions};
use tracing::{error, info, warn};

use crate::output::{
    decoded_file_name, encoded_file_name, output_dir, read_whole_file, sanitize_name,
    write_unique,
};

/// Which way a path is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

impl Direction {
    /// `.png` (any case) is decoded, everything else encoded.
    pub fn for_path(path: &Path) -> Self {
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            Direction::Decode
        } else {
            Direction::Encode
        }
    }
}

/// Embed the file at `path` in a container next to it (or in `out_dir`).
///
/// The payload keeps `name` as given; the output file name is built from its
/// sanitized form so it always lands in the output directory.
pub fn encode_file(
    path: &Path,
    name: Option<&str>,
    out_dir: Option<&Path>,
    metrics: &mut Metrics,
) -> Result<PathBuf> {
    let file_name = match name {
        Some(n) => n.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display()))?,
    };

    let bytes = read_whole_file(path).with_context(|| format!("reading {}", path.display()))?;
    let png = encode(&file_name, &bytes).with_context(|| format!("encoding {}", path.display()))?;

    let dir = output_dir(path, out_dir);
    let written = write_unique(&dir, &encoded_file_name(&sanitize_name(&file_name)), &png)
        .with_context(|| format!("writing container to {}", dir.display()))?;

    metrics.record_encode(bytes.len(), png.len());
    info!(
        input = %path.display(),
        output = %written.display(),
        bytes = bytes.len(),
        "file converted to PNG"
    );
    Ok(written)
}

/// Extract the file embedded in the container at `path`.
pub fn decode_file(
    path: &Path,
    out_dir: Option<&Path>,
    options: &DecodeOptions,
    metrics: &mut Metrics,
) -> Result<PathBuf> {
    let bytes = open_container(path)?;
    let file = decode_with(&bytes, options)
        .with_context(|| format!("decoding {}", path.display()))?;

    let dir = output_dir(path, out_dir);
    let written = write_unique(&dir, &decoded_file_name(&file.name), &file.data)
        .with_context(|| format!("writing extracted file to {}", dir.display()))?;

    metrics.record_decode(bytes.len(), file.data.len());
    info!(
        input = %path.display(),
        output = %written.display(),
        embedded_name = %file.name,
        bytes = file.data.len(),
        "PNG converted back to file"
    );
    Ok(written)
}

fn open_container(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_container(file).with_context(|| format!("reading {}", path.display()))
}

/// Convert every path by extension. Failures are logged and counted, not
/// propagated, so one bad input does not stop the rest.
pub fn convert_all(
    paths: &[PathBuf],
    out_dir: Option<&Path>,
    options: &DecodeOptions,
    metrics: &mut Metrics,
) -> Vec<PathBuf> {
    let mut written = Vec::with_capacity(paths.len());

    for path in paths {
        if !path.is_file() {
            warn!(path = %path.display(), "not a file, skipping");
            continue;
        }

        let result = match Direction::for_path(path) {
            Direction::Decode => decode_file(path, out_dir, options, metrics),
            Direction::Encode => encode_file(path, None, out_dir, metrics),
        };

        match result {
            Ok(p) => written.push(p),
            Err(e) => {
                metrics.record_failure();
                error!(path = %path.display(), "conversion failed: {e:#}");
            }
        }
    }

    written
}

/// Print the chunk table of the container at `path`.
pub fn inspect_file(path: &Path, metrics: &mut Metrics) -> Result<()> {
    let bytes = open_container(path)?;
    let rows = inspect(&bytes).with_context(|| format!("inspecting {}", path.display()))?;

    println!("{}: {} bytes, {} chunks", path.display(), bytes.len(), rows.len());
    println!("{:>10}  {:<4}  {:>10}  {:>10}  crc", "offset", "type", "length", "stored");
    for row in &rows {
        println!(
            "{:>10}  {:<4}  {:>10}  {:#010x}  {}",
            row.offset,
            row.chunk_type.to_string(),
            row.length,
            row.crc,
            if row.crc_ok { "ok" } else { "MISMATCH" }
        );
    }

    metrics.record_inspect(bytes.len(), rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_by_extension() {
        assert_eq!(Direction::for_path(Path::new("a.png")), Direction::Decode);
        assert_eq!(Direction::for_path(Path::new("A.PNG")), Direction::Decode);
        assert_eq!(Direction::for_path(Path::new("a.txt")), Direction::Encode);
        assert_eq!(Direction::for_path(Path::new("png")), Direction::Encode);
        assert_eq!(Direction::for_path(Path::new("a.png.bak")), Direction::Encode);
    }

    #[test]
    fn test_encode_then_decode_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"hello from disk").unwrap();

        let mut metrics = Metrics::new();
        let png = encode_file(&input, None, None, &mut metrics).unwrap();
        assert_eq!(png, dir.path().join("notes.txt.png"));

        let out = decode_file(&png, None, &DecodeOptions::default(), &mut metrics).unwrap();
        assert_eq!(out, dir.path().join("extracted_notes.txt"));
        assert_eq!(std::fs::read(&out).unwrap(), b"hello from disk");

        assert_eq!(metrics.files_encoded, 1);
        assert_eq!(metrics.files_decoded, 1);
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.txt");
        std::fs::write(&input, b"x").unwrap();

        let mut metrics = Metrics::new();
        let first = encode_file(&input, None, None, &mut metrics).unwrap();
        let second = encode_file(&input, None, None, &mut metrics).unwrap();
        assert_eq!(first.file_name().unwrap(), "a.txt.png");
        assert_eq!(second.file_name().unwrap(), "a.txt_1.png");
    }

    #[test]
    fn test_name_override_and_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.bin");
        std::fs::write(&input, [1, 2, 3]).unwrap();

        let mut metrics = Metrics::new();
        let png = encode_file(&input, Some("named.bin"), Some(out.path()), &mut metrics).unwrap();
        assert_eq!(png, out.path().join("named.bin.png"));

        let file = pngwrap_core::decode(&std::fs::read(&png).unwrap()).unwrap();
        assert_eq!(file.name, "named.bin");
    }

    #[test]
    fn test_traversal_name_stays_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("evil.png");
        std::fs::write(&png, encode("../../escape.sh", b"#!/bin/sh").unwrap()).unwrap();

        let mut metrics = Metrics::new();
        let out = decode_file(&png, None, &DecodeOptions::default(), &mut metrics).unwrap();
        assert_eq!(out, dir.path().join("extracted_escape.sh"));
    }

    #[test]
    fn test_name_override_cannot_escape_out_dir() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        let input = root.path().join("raw.bin");
        std::fs::write(&input, b"data").unwrap();

        let mut metrics = Metrics::new();
        let png = encode_file(&input, Some("../escaped"), Some(&out), &mut metrics).unwrap();
        assert_eq!(png, out.join("escaped.png"));
        assert!(!root.path().join("escaped.png").exists());

        // the payload keeps the name as given
        let file = pngwrap_core::decode(&std::fs::read(&png).unwrap()).unwrap();
        assert_eq!(file.name, "../escaped");
    }

    #[test]
    fn test_convert_all_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.png");
        std::fs::write(&good, b"fine").unwrap();
        std::fs::write(&bad, b"not a png at all").unwrap();

        let mut metrics = Metrics::new();
        let written = convert_all(
            &[good, bad, dir.path().join("missing.txt")],
            None,
            &DecodeOptions::default(),
            &mut metrics,
        );

        assert_eq!(written, vec![dir.path().join("good.txt.png")]);
        assert_eq!(metrics.files_encoded, 1);
        assert_eq!(metrics.files_failed, 1);
        // nothing partial was written for the failed decode
        assert!(!dir.path().join("extracted_file").exists());
    }

    #[test]
    fn test_decode_error_keeps_core_error() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("empty.png");
        std::fs::write(&png, pngwrap_core::format::SIGNATURE).unwrap();

        let mut metrics = Metrics::new();
        let err = decode_file(&png, None, &DecodeOptions::default(), &mut metrics).unwrap_err();
        let core = err.downcast_ref::<pngwrap_core::Error>().unwrap();
        assert_eq!(core.kind(), pngwrap_core::ErrorKind::PayloadNotFound);
    }
}
