use super::digest::{DIGEST_LEN, Digest};

/// Highest strength a 32-byte digest can reach (every hex digit zero).
pub const MAX_STRENGTH: u32 = (DIGEST_LEN * 2) as u32;

/// Number of trailing zero hex digits in the digest.
///
/// Bytes are scanned from the last one backward: a zero byte counts 2 and the
/// scan continues, a byte with only its low nibble zero counts 1 and stops,
/// anything else stops without counting.
pub fn strength_of(d: &Digest) -> u32 {
    let mut count = 0;
    for byte in d.iter().rev() {
        if byte & 0x0f != 0 {
            break;
        }
        if *byte == 0 {
            count += 2;
            continue;
        }
        count += 1;
        break;
    }
    count
}

/// True when the digest has at least `strength` trailing zero hex digits.
pub fn satisfies(d: &Digest, strength: u32) -> bool {
    strength_of(d) >= strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow::digest::{digest, to_hex};

    fn with_tail(tail: &[u8]) -> Digest {
        let mut d = [0xffu8; DIGEST_LEN];
        d[DIGEST_LEN - tail.len()..].copy_from_slice(tail);
        d
    }

    #[test]
    fn counts_nibbles_not_bytes() {
        assert_eq!(strength_of(&with_tail(&[0x01])), 0);
        assert_eq!(strength_of(&with_tail(&[0x10])), 1);
        assert_eq!(strength_of(&with_tail(&[0x00])), 2);
        assert_eq!(strength_of(&with_tail(&[0x40, 0x00])), 3);
        assert_eq!(strength_of(&with_tail(&[0x0f, 0x00])), 2);
        assert_eq!(strength_of(&with_tail(&[0x00, 0x00])), 4);
        // a zero high nibble before a non-zero low nibble does not count
        assert_eq!(strength_of(&with_tail(&[0x00, 0x03])), 0);
    }

    #[test]
    fn all_zero_digest_is_max_strength() {
        assert_eq!(strength_of(&[0u8; DIGEST_LEN]), MAX_STRENGTH);
    }

    #[test]
    fn agrees_with_hex_rendering() {
        for i in 0..2000u32 {
            let d = digest(format!("sample {i}").as_bytes());
            let hex = to_hex(&d);
            let trailing = hex.chars().rev().take_while(|c| *c == '0').count() as u32;
            assert_eq!(strength_of(&d), trailing, "digest {hex}");
        }
    }

    #[test]
    fn predicate_is_monotonic() {
        let d = with_tail(&[0x40, 0x00, 0x00]);
        let k = strength_of(&d);
        assert_eq!(k, 5);
        for t in 0..=k {
            assert!(satisfies(&d, t));
        }
        for t in k + 1..=MAX_STRENGTH + 1 {
            assert!(!satisfies(&d, t));
        }
    }

    #[test]
    fn zero_threshold_always_holds() {
        assert!(satisfies(&with_tail(&[0x01]), 0));
    }
}
