//! In-memory round-trip check over generated sample files.
//!
//! Works with zero arguments: the seed defaults to the clock and is printed,
//! so a failing run can be replayed with `--seed`.

use anyhow::Result;
use pngwrap_core::metrics::Metrics;
use pngwrap_core::{decode_with, encode, DecodeOptions, EmbeddedFile};
use tracing::{debug, error, info};

use crate::input_gen::{generate_sample_data, generate_sample_name};

/// Run `rounds` round trips. Returns the number of mismatches.
pub fn run(
    seed: u64,
    size: usize,
    rounds: usize,
    options: &DecodeOptions,
    metrics: &mut Metrics,
) -> Result<usize> {
    info!(seed, size, rounds, "starting self-test");
    let mut mismatches = 0;

    for round in 0..rounds as u64 {
        let round_seed = seed.wrapping_add(round);
        let name = generate_sample_name(round_seed);
        // vary sizes around the requested one, including empty files
        let len = if round == 0 { 0 } else { size / (round as usize) };
        let data = generate_sample_data(round_seed, len);

        let png = encode(&name, &data)?;
        metrics.record_encode(data.len(), png.len());

        let file = decode_with(&png, options)?;
        if record_round(&name, &data, &file, png.len(), metrics) {
            debug!(round, name = %name, bytes = len, "round trip ok");
        } else {
            mismatches += 1;
            error!(round, seed = round_seed, name = %name, "round trip mismatch");
        }
    }

    Ok(mismatches)
}

/// Compare a decoded file with what was encoded and count it once: as a
/// decode when it matches, as a failure otherwise.
fn record_round(
    name: &str,
    data: &[u8],
    file: &EmbeddedFile,
    container_len: usize,
    metrics: &mut Metrics,
) -> bool {
    if file.name == name && file.data == data {
        metrics.record_decode(container_len, file.data.len());
        true
    } else {
        metrics.record_failure();
        false
    }
}
