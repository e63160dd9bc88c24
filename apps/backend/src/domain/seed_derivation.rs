//! RNG seed derivation utilities for deterministic dealing.
//!
//! Every room draws one base seed when it is created. Each hand's shuffle
//! seed is derived from it, so a hand can be replayed from `(room_seed, hand_no)`.

/// Derive a seed for shuffling the deck of a hand.
///
/// # Arguments
///
/// * `room_seed` - Base RNG seed drawn when the room was created
/// * `hand_no` - 1-based hand counter within the game
///
/// # Returns
///
/// Derived seed that is unique per (room, hand) combination.
pub fn derive_dealing_seed(room_seed: u64, hand_no: u32) -> u64 {
    // SplitMix64 finalizer over the combined input; spreads neighbouring hands apart
    let mut z = room_seed
        .wrapping_add((hand_no as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(2);
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
