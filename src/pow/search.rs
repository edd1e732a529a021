use serde::Serialize;

use super::digest::{Digest, digest, to_hex};
use super::error::PowError;
use super::nonce::NonceEncoding;
use super::strength::{MAX_STRENGTH, satisfies, strength_of};

/// Byte placed between the prefix and the encoded nonce.
pub const SEPARATOR: u8 = b' ';

/// What a puzzle asks for: a prefix, a strength and the nonce encoding.
/// Immutable once built; strength is validated on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    prefix: String,
    strength: u32,
    encoding: NonceEncoding,
}

/// A winning nonce together with what it hashed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub nonce: u64,
    pub encoded: String,
    pub hash: String,
    pub strength: u32,
}

/// How a scan over the counter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    Found(u64),
    /// Counter hit the limit (or `u64::MAX`); carries where it stopped.
    Exhausted(u64),
    /// The stop hook asked for an early exit.
    Stopped,
}

impl Puzzle {
    pub fn new(prefix: impl Into<String>, strength: u32) -> Result<Self, PowError> {
        if strength > MAX_STRENGTH {
            return Err(PowError::UnsatisfiableStrength {
                strength,
                max: MAX_STRENGTH,
            });
        }
        Ok(Self {
            prefix: prefix.into(),
            strength,
            encoding: NonceEncoding::default(),
        })
    }

    pub fn with_encoding(mut self, encoding: NonceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    pub fn encoding(&self) -> NonceEncoding {
        self.encoding
    }

    /// Bytes hashed for `nonce`: prefix, one space, encoded nonce.
    pub fn candidate(&self, nonce: u64) -> Vec<u8> {
        let mut buf = self.base();
        buf.extend_from_slice(self.encoding.encode(nonce).as_bytes());
        buf
    }

    pub fn digest_of(&self, nonce: u64) -> Digest {
        digest(&self.candidate(nonce))
    }

    /// Digest for a nonce already in textual form.
    pub fn digest_encoded(&self, encoded: &str) -> Digest {
        let mut buf = self.base();
        buf.extend_from_slice(encoded.as_bytes());
        digest(&buf)
    }

    /// Single trial: does `nonce` meet the strength?
    pub fn accepts(&self, nonce: u64) -> bool {
        satisfies(&self.digest_of(nonce), self.strength)
    }

    pub fn solution(&self, nonce: u64) -> Solution {
        let d = self.digest_of(nonce);
        Solution {
            nonce,
            encoded: self.encoding.encode(nonce),
            hash: to_hex(&d),
            strength: strength_of(&d),
        }
    }

    /// Try counters from `start` upward until one satisfies the strength.
    ///
    /// With a `limit`, the search gives up with `NotFound` once the counter
    /// reaches it. The trial at `start` always happens. Without a limit the
    /// search only ends on a match, or at `u64::MAX`.
    pub fn search(&self, start: u64, limit: Option<u64>) -> Result<u64, PowError> {
        match self.scan(start, limit, || false) {
            Scan::Found(nonce) => Ok(nonce),
            Scan::Exhausted(end) => Err(PowError::NotFound { start, limit: end }),
            Scan::Stopped => Err(PowError::NotFound {
                start,
                limit: limit.unwrap_or(u64::MAX),
            }),
        }
    }

    /// The search loop shared by sequential and parallel callers. `stop` is
    /// polled before every trial.
    pub(crate) fn scan(&self, start: u64, limit: Option<u64>, stop: impl Fn() -> bool) -> Scan {
        let mut buf = self.base();
        let base_len = buf.len();
        let mut nonce = start;
        loop {
            if stop() {
                return Scan::Stopped;
            }
            buf.truncate(base_len);
            buf.extend_from_slice(self.encoding.encode(nonce).as_bytes());
            if satisfies(&digest(&buf), self.strength) {
                return Scan::Found(nonce);
            }
            nonce = match nonce.checked_add(1) {
                Some(next) => next,
                None => return Scan::Exhausted(u64::MAX),
            };
            if limit.is_some_and(|l| nonce >= l) {
                return Scan::Exhausted(nonce);
            }
        }
    }

    fn base(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.prefix.len() + 1 + 16);
        buf.extend_from_slice(self.prefix.as_bytes());
        buf.push(SEPARATOR);
        buf
    }
}
