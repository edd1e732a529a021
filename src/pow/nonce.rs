use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Longest base-62 rendering kept. 62^11 > 2^64, so every `u64` fits and no
/// two counters share an encoding.
pub const BASE62_MAX_SYMBOLS: usize = 11;

/// Textual form of a nonce appended to the prefix before hashing.
///
/// `Hex` is the wire format: scores, the HTTP API and `pow::search` all use
/// it unless a caller opts into `Base62` explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceEncoding {
    #[default]
    Hex,
    Base62,
}

impl NonceEncoding {
    pub fn encode(self, nonce: u64) -> String {
        match self {
            NonceEncoding::Hex => format!("{nonce:x}"),
            NonceEncoding::Base62 => encode_base62(nonce),
        }
    }
}

impl fmt::Display for NonceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonceEncoding::Hex => f.write_str("hex"),
            NonceEncoding::Base62 => f.write_str("base62"),
        }
    }
}

impl FromStr for NonceEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(NonceEncoding::Hex),
            "base62" => Ok(NonceEncoding::Base62),
            other => Err(format!("unknown nonce encoding: {other}")),
        }
    }
}

/// Most significant symbol first, no padding, "0" for zero.
fn encode_base62(mut n: u64) -> String {
    let mut buf = [0u8; BASE62_MAX_SYMBOLS];
    let mut pos = BASE62_MAX_SYMBOLS;
    loop {
        pos -= 1;
        buf[pos] = BASE62_ALPHABET[(n % 62) as usize];
        n /= 62;
        if n == 0 || pos == 0 {
            break;
        }
    }
    // alphabet is ASCII
    buf[pos..].iter().map(|b| *b as char).collect()
}
