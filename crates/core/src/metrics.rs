//! Counters for a conversion run.
//!
//! Collected by the CLI across every file it converts and printed at the end.
//! Updates are explicit calls at each step; the struct is not thread-safe.

use std::time::{Duration, Instant};

/// Metrics for one run of the converter.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Files ===
    /// Files embedded into containers
    pub files_encoded: u64,

    /// Files extracted from containers
    pub files_decoded: u64,

    /// Files that failed to convert
    pub files_failed: u64,

    // === Bytes ===
    /// Total bytes read from inputs
    pub input_bytes: u64,

    /// Total bytes written to outputs
    pub output_bytes: u64,

    /// Original file bytes carried in payload chunks
    pub payload_bytes: u64,

    // === Chunks ===
    /// Chunks written by the encoder
    pub chunks_written: u64,

    /// Chunks listed by the inspector
    pub chunks_scanned: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            files_encoded: 0,
            files_decoded: 0,
            files_failed: 0,
            input_bytes: 0,
            output_bytes: 0,
            payload_bytes: 0,
            chunks_written: 0,
            chunks_scanned: 0,
        }
    }

    /// Record a successful encode.
    pub fn record_encode(&mut self, input_len: usize, container_len: usize) {
        self.files_encoded += 1;
        self.input_bytes += input_len as u64;
        self.output_bytes += container_len as u64;
        self.payload_bytes += input_len as u64;
        // IHDR, IDAT, fiLe, IEND
        self.chunks_written += 4;
    }

    /// Record a successful decode.
    pub fn record_decode(&mut self, container_len: usize, file_len: usize) {
        self.files_decoded += 1;
        self.input_bytes += container_len as u64;
        self.output_bytes += file_len as u64;
        self.payload_bytes += file_len as u64;
    }

    /// Record a container listed by the inspector.
    pub fn record_inspect(&mut self, container_len: usize, chunks: usize) {
        self.input_bytes += container_len as u64;
        self.chunks_scanned += chunks as u64;
    }

    pub fn record_failure(&mut self) {
        self.files_failed += 1;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Container bytes beyond the payload, relative to the payload.
    ///
    /// Returns 0.0 if no payload was carried.
    pub fn overhead_ratio(&self) -> f64 {
        if self.payload_bytes == 0 {
            0.0
        } else {
            let larger = self.input_bytes.max(self.output_bytes);
            larger.saturating_sub(self.payload_bytes) as f64 / self.payload_bytes as f64
        }
    }

    /// Input bytes per second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    pub fn succeeded(&self) -> bool {
        self.files_failed == 0
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Conversion Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Encoded: {}", self.files_encoded);
        println!("Decoded: {}", self.files_decoded);
        println!("Failed:  {}", self.files_failed);
        println!();
        println!("Input:   {} bytes ({:.2} MiB)", self.input_bytes, mib(self.input_bytes));
        println!("Output:  {} bytes ({:.2} MiB)", self.output_bytes, mib(self.output_bytes));
        println!("Payload: {} bytes ({:.2} MiB)", self.payload_bytes, mib(self.payload_bytes));
        println!("Overhead: {:.2}%", self.overhead_ratio() * 100.0);
        println!();
        println!("Chunks written: {}", self.chunks_written);
        println!("Chunks scanned: {}", self.chunks_scanned);
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        let converted = self.files_encoded + self.files_decoded;
        if self.succeeded() {
            println!("✓ {} file(s) converted in {} ms", converted, self.duration().as_millis());
        } else {
            println!("✗ {} of {} file(s) failed", self.files_failed, converted + self.files_failed);
        }
    }

    /// Export metrics as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             files_encoded={}\n\
             files_decoded={}\n\
             files_failed={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             payload_bytes={}\n\
             overhead_ratio={:.4}\n\
             chunks_written={}\n\
             chunks_scanned={}\n",
            self.duration().as_millis(),
            self.files_encoded,
            self.files_decoded,
            self.files_failed,
            self.input_bytes,
            self.output_bytes,
            self.payload_bytes,
            self.overhead_ratio(),
            self.chunks_written,
            self.chunks_scanned,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
