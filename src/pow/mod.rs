//! Nonce search: find a counter whose hex encoding, appended to a prefix
//! after one space, hashes (SHA-256) to a digest ending in at least
//! `strength` zero hex digits.

pub mod coordinator;
pub mod digest;
pub mod error;
pub mod nonce;
pub mod search;
pub mod strength;

pub use coordinator::{Coordinator, Latch};
pub use digest::{DIGEST_LEN, Digest, digest, to_hex};
pub use error::PowError;
pub use nonce::{BASE62_MAX_SYMBOLS, NonceEncoding};
pub use search::{Puzzle, SEPARATOR, Solution};
pub use strength::{MAX_STRENGTH, satisfies, strength_of};

/// Find a nonce for `prefix` at `strength` using every core; returns its hex
/// encoding. Fails fast when the strength can never be met.
pub fn search(prefix: &str, strength: u32) -> Result<String, PowError> {
    let puzzle = Puzzle::new(prefix, strength)?;
    Coordinator::new().run(&puzzle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_meets_strength() {
        for strength in [0, 1, 3] {
            let encoded = search("Hello World", strength).unwrap();
            let d = digest(format!("Hello World {encoded}").as_bytes());
            assert!(strength_of(&d) >= strength);
        }
    }

    #[test]
    fn search_fails_fast_above_max() {
        for strength in [65, 100, u32::MAX] {
            let err = search("abc", strength).unwrap_err();
            assert!(matches!(err, PowError::UnsatisfiableStrength { .. }));
        }
    }
}
