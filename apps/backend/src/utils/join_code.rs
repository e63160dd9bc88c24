//! Room code generation.
//!
//! Room codes are 5-character strings drawn from an uppercase alphabet
//! without look-alike glyphs, so they can be read aloud and typed by hand.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789"; // no I, O, 0, 1

pub const ROOM_CODE_LEN: usize = 5;

/// Generate a room code using the OS random source.
///
/// Uniqueness is the caller's job: the registry regenerates on collision.
pub fn generate_room_code() -> String {
    let mut rng = StdRng::from_os_rng();
    (0..ROOM_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Normalize a user-typed room code.
pub fn normalize_room_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
