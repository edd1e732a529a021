use crate::config::Config;
use crate::pow::{Coordinator, NonceEncoding};
use crate::score::Score;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;

/// Shared application state: settings, the search engine and the node score.
pub struct AppState {
    pub config: Config,
    pub coordinator: Coordinator,
    pub score: Mutex<Score>,
    pub searches_ok: AtomicU64,
    pub searches_failed: AtomicU64,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let coordinator = config.coordinator();
        let score = fresh_score(&config);
        Self {
            config,
            coordinator,
            score: Mutex::new(score),
            searches_ok: AtomicU64::new(0),
            searches_failed: AtomicU64::new(0),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Empty score anchored at the current time.
pub fn fresh_score(config: &Config) -> Score {
    Score::new(
        Utc::now(),
        config.host.clone(),
        config.port,
        config.invoice.clone(),
        config.score_strength,
    )
}

/* ---------- Nonce API Models ---------- */

#[derive(Deserialize)]
pub struct NonceRequest {
    pub prefix: String,
    pub strength: u32,
    pub encoding: Option<NonceEncoding>,
}

#[derive(Serialize)]
pub struct NonceResponse {
    pub nonce: String, // encoded
    pub encoding: NonceEncoding,
    pub hash: String,
    pub strength: u32, // achieved, >= requested
    pub elapsed_ms: u128,
}

/* ---------- Score API Models ---------- */

#[derive(Serialize)]
pub struct ScoreResponse {
    pub score: String, // compact text
    pub display: String,
    pub value: usize,
    pub strength: u32,
    pub hash: Option<String>,
    pub valid: bool,
    pub expired: bool,
    pub age_secs: i64,
}

impl ScoreResponse {
    pub fn of(score: &Score) -> Self {
        let now = Utc::now();
        Self {
            score: score.to_text(),
            display: score.to_string(),
            value: score.value(),
            strength: score.strength,
            hash: score.hash(),
            valid: score.valid(),
            expired: score.expired(now),
            age_secs: score.age(now).num_seconds(),
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyScoreRequest {
    pub score: String,
}

/* ---------- Stats API Models ---------- */

#[derive(Serialize)]
pub struct StatsResponse {
    pub threads: usize,
    pub deadline_secs: Option<u64>,
    pub max_trials: Option<u64>,
    pub encoding: NonceEncoding,
    pub score_strength: u32,
    pub score_value: usize,
    pub searches_ok: u64,
    pub searches_failed: u64,
}
