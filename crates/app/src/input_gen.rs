//! Sample file generation for the self-test.
//!
//! Generated contents mix runs, text-like bytes and random bytes so that the
//! container is exercised with realistic data. Generated names mix ASCII and
//! multi-byte UTF-8 so that name framing is exercised too.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Characters sample names are drawn from.
const NAME_CHARS: &[char] = &[
    'a', 'b', 'c', 'x', 'y', 'z', '0', '1', '9', '-', '_', ' ', 'é', 'ü', 'ß', 'Ж', 'я', '中', '文',
    '🦀',
];

const EXTENSIONS: &[&str] = &["txt", "bin", "pdf", "tar.gz", "jpg", ""];

/// Generate sample file contents with mixed content.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `size_bytes`: exact size of the generated data
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let block = (size_bytes - data.len()).min(8192);

        match rng.gen_range(0..10u8) {
            // runs of one byte
            0..=2 => {
                let byte_value: u8 = rng.gen();
                data.extend(std::iter::repeat(byte_value).take(block));
            }

            // text-like
            3..=6 => {
                let alphabet = b"abcdefghijklmnopqrstuvwxyz .!,\n";
                data.extend((0..block).map(|_| alphabet[rng.gen_range(0..alphabet.len())]));
            }

            // random bytes
            _ => {
                data.extend((0..block).map(|_| rng.gen::<u8>()));
            }
        }
    }

    data
}

/// Generate a file name such as `zé_1中.tar.gz`.
pub fn generate_sample_name(seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let len = rng.gen_range(1..=24);
    let mut name: String = (0..len)
        .map(|_| NAME_CHARS[rng.gen_range(0..NAME_CHARS.len())])
        .collect();

    let ext = EXTENSIONS[rng.gen_range(0..EXTENSIONS.len())];
    if !ext.is_empty() {
        name.push('.');
        name.push_str(ext);
    }
    name
}
