//! Human-facing case number generation
//!
//! Case numbers look like `RC-7K4M2XQ9`. Uniqueness is enforced by the unique
//! index on `cases.case_number`; the service retries with a fresh number on
//! collision, so the generator itself only needs a large enough space.

use rand::Rng;

/// Characters used in the random suffix. Ambiguous glyphs (0/O, 1/I/L) are
/// left out so the number survives being read over the phone.
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of the random suffix
const SUFFIX_LEN: usize = 8;

/// Generate a case number with the given prefix
pub fn generate_case_number(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARSET.len());
            SUFFIX_CHARSET[idx] as char
        })
        .collect();

    format!("{}-{}", prefix, suffix)
}
