use sha2::{Digest as _, Sha256};

/// Size in bytes of every digest the engine produces.
pub const DIGEST_LEN: usize = 32;

/// A SHA-256 output.
pub type Digest = [u8; DIGEST_LEN];

/// Compute the SHA-256 digest of `bytes`.
pub fn digest(bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Lowercase hex rendering of a digest (64 chars).
pub fn to_hex(d: &Digest) -> String {
    hex::encode(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_vectors() {
        assert_eq!(
            to_hex(&digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            to_hex(&digest(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn always_32_bytes() {
        let long = vec![7u8; 10_000];
        assert_eq!(digest(&long).len(), DIGEST_LEN);
        assert_eq!(to_hex(&digest(&long)).len(), 2 * DIGEST_LEN);
    }
}
