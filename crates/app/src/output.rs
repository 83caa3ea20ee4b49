//! Whole-file I/O and output naming.
//!
//! Writes go through a temporary file in the destination directory that is
//! persisted without clobbering, so a failed write never leaves a partial file
//! and an existing file is never replaced.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

/// Give up after this many `_n` suffixes.
const MAX_SUFFIX: u32 = 10_000;

/// Prefix for files recovered from containers.
const EXTRACTED_PREFIX: &str = "extracted_";

/// Used when an embedded name has nothing usable left after sanitizing.
const FALLBACK_NAME: &str = "file";

pub fn read_whole_file(path: &Path) -> io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Write `bytes` to `path`, failing with `AlreadyExists` if it is taken.
pub fn write_whole_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `bytes` as `file_name` in `dir`, adding `_1`, `_2`, ... before the
/// extension until a free name is found. Creates `dir` if needed and returns
/// the path written.
pub fn write_unique(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    for n in 0..=MAX_SUFFIX {
        let candidate = dir.join(suffixed(file_name, n));
        if candidate.exists() {
            continue;
        }
        match write_whole_file(&candidate, bytes) {
            Ok(()) => return Ok(candidate),
            // lost a race with another writer
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %candidate.display(), "output name taken, trying next");
            }
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {file_name} in {}", dir.display()),
    ))
}

/// `name` for n = 0, otherwise `stem_n.ext`.
pub fn suffixed(file_name: &str, n: u32) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{n}{}", &file_name[..dot], &file_name[dot..]),
        _ => format!("{file_name}_{n}"),
    }
}

/// Output name for a file being embedded.
pub fn encoded_file_name(input_name: &str) -> String {
    format!("{input_name}.png")
}

/// Output name for a file recovered from a container.
pub fn decoded_file_name(embedded_name: &str) -> String {
    format!("{EXTRACTED_PREFIX}{}", sanitize_name(embedded_name))
}

/// Reduce an embedded name to a single safe path component.
///
/// Keeps only the part after the last `/` or `\`, drops control characters,
/// and falls back to `file` for empty, `.` or `..`.
pub fn sanitize_name(name: &str) -> String {
    let last = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    match cleaned.trim() {
        "" | "." | ".." => FALLBACK_NAME.to_string(),
        _ => cleaned,
    }
}

/// Directory to write an output for `input` into.
pub fn output_dir(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = out_dir {
        return dir.to_path_buf();
    }
    match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
