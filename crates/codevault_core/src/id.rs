//! Short, URL-safe paste identifiers.
//!
//! Ids are drawn uniformly from a 64-symbol alphabet, so a ten character id
//! carries 60 bits of entropy. Uniqueness is still enforced at insert time by
//! the repository, which regenerates on collision.

use crate::constants::PASTE_ID_LENGTH;
use rand::distributions::Distribution;
use rand::Rng;

/// Characters that survive URL paths and query strings without escaping.
pub const ID_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

/// Samples single id characters from [`ID_ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IdChar;

impl Distribution<char> for IdChar {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char
    }
}

/// Generate an id of `len` characters using the supplied RNG.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| IdChar.sample(rng)).collect()
}

/// Generate a fresh paste id from the thread-local RNG.
pub fn generate_id() -> String {
    generate_id_with(&mut rand::thread_rng(), PASTE_ID_LENGTH)
}
