use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::pow::{Coordinator, NonceEncoding};
use crate::score::{DEFAULT_INVOICE, DEFAULT_STRENGTH};

/// Wall-clock bound on every search the node runs.
pub const DEFAULT_DEADLINE_SECS: u64 = 60;

/// Node settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub invoice: String,
    pub score_strength: u32,
    /// `None` means one worker per hardware thread.
    pub threads: Option<usize>,
    /// Always set: a request must never pin the workers forever.
    pub deadline: Duration,
    pub max_trials: Option<u64>,
    pub encoding: NonceEncoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            invoice: DEFAULT_INVOICE.to_string(),
            score_strength: DEFAULT_STRENGTH,
            threads: None,
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            max_trials: None,
            encoding: NonceEncoding::Hex,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults and
    /// unparseable ones are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            invoice: lookup("INVOICE").unwrap_or(defaults.invoice),
            score_strength: parsed(&lookup, "SCORE_STRENGTH").unwrap_or(defaults.score_strength),
            threads: parsed(&lookup, "POW_THREADS"),
            deadline: parsed::<u64>(&lookup, "POW_DEADLINE_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.deadline),
            max_trials: parsed(&lookup, "POW_MAX_TRIALS"),
            encoding: parsed(&lookup, "POW_ENCODING").unwrap_or(defaults.encoding),
        }
    }

    /// Coordinator matching these settings.
    pub fn coordinator(&self) -> Coordinator {
        let mut coordinator = Coordinator::new().with_deadline(self.deadline);
        if let Some(threads) = self.threads {
            coordinator = coordinator.with_threads(threads);
        }
        if let Some(max_trials) = self.max_trials {
            coordinator = coordinator.with_max_trials(max_trials);
        }
        coordinator
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}
