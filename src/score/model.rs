use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use super::{SCORE_LIFETIME_HOURS, ScoreError};
use crate::pow::{Coordinator, PowError, Puzzle, digest, strength_of, to_hex};

/// A node's proof of work: a chain of suffixes anchored on when and where
/// the node runs and who gets paid. Every link hashes the previous link's
/// hex digest, a space and the suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub time: DateTime<Utc>, // whole seconds
    pub host: String,
    pub port: u16,
    pub invoice: String,
    pub suffixes: Vec<String>,
    pub strength: u32,
}

impl Score {
    /// Start an empty score. Sub-second precision of `time` is dropped.
    pub fn new(
        time: DateTime<Utc>,
        host: impl Into<String>,
        port: u16,
        invoice: impl Into<String>,
        strength: u32,
    ) -> Self {
        Self {
            time: DateTime::from_timestamp(time.timestamp(), 0).unwrap_or(time),
            host: host.into(),
            port,
            invoice: invoice.into(),
            suffixes: Vec::new(),
            strength,
        }
    }

    pub fn with_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Anchor of the first link.
    pub fn prefix(&self) -> String {
        format!(
            "{} {} {} {}",
            self.time.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.host,
            self.port,
            self.invoice
        )
    }

    /// Hex digest of the last link, `None` for an empty score.
    pub fn hash(&self) -> Option<String> {
        if self.suffixes.is_empty() {
            return None;
        }
        Some(self.suffixes.iter().fold(self.prefix(), |anchor, suffix| {
            to_hex(&digest(format!("{anchor} {suffix}").as_bytes()))
        }))
    }

    pub fn value(&self) -> usize {
        self.suffixes.len()
    }

    /// Extend the chain by one suffix found with `coordinator`.
    pub fn next(&self, coordinator: &Coordinator) -> Result<Score, PowError> {
        let anchor = self.hash().unwrap_or_else(|| self.prefix());
        let puzzle = Puzzle::new(anchor, self.strength)?;
        let suffix = coordinator.run(&puzzle)?;
        let mut next = self.clone();
        next.suffixes.push(suffix);
        Ok(next)
    }

    /// Every link meets the score's strength.
    pub fn valid(&self) -> bool {
        let mut anchor = self.prefix();
        for suffix in &self.suffixes {
            let d = digest(format!("{anchor} {suffix}").as_bytes());
            if strength_of(&d) < self.strength {
                return false;
            }
            anchor = to_hex(&d);
        }
        true
    }

    /// Keep only the first `max` suffixes.
    pub fn reduced(&self, max: usize) -> Score {
        let mut reduced = self.clone();
        reduced.suffixes.truncate(max);
        reduced
    }

    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.time
    }

    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > TimeDelta::hours(SCORE_LIFETIME_HOURS)
    }

    /// Compact form: `<strength> <unix secs hex> <host> <port hex> <invoice> <suffixes...>`.
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "{} {:x} {} {:x} {}",
            self.strength,
            self.time.timestamp(),
            self.host,
            self.port,
            self.invoice
        );
        for suffix in &self.suffixes {
            text.push(' ');
            text.push_str(suffix);
        }
        text
    }

    pub fn parse_text(text: &str) -> Result<Score, ScoreError> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() < 5 {
            return Err(ScoreError::Malformed(text.to_string()));
        }
        let strength = parse_field("strength", parts[0], |s| s.parse::<u32>().ok())?;
        let time = parse_field("time", parts[1], |s| {
            i64::from_str_radix(s, 16)
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
        })?;
        let port = parse_field("port", parts[3], |s| u16::from_str_radix(s, 16).ok())?;
        Ok(Score::new(time, parts[2], port, parts[4], strength)
            .with_suffixes(parts[5..].iter().map(|s| s.to_string()).collect()))
    }
}

fn parse_field<T>(
    field: &'static str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ScoreError> {
    parse(value).ok_or_else(|| ScoreError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// `<strength>/<value>: <RFC3339 time> <host> <port> <invoice> <suffixes...>`
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.strength, self.value(), self.prefix())?;
        for suffix in &self.suffixes {
            write!(f, " {suffix}")?;
        }
        Ok(())
    }
}

impl FromStr for Score {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, body) = s
            .trim()
            .split_once(": ")
            .ok_or_else(|| ScoreError::Malformed(s.to_string()))?;
        let (strength, claimed) = head
            .split_once('/')
            .ok_or_else(|| ScoreError::Malformed(s.to_string()))?;
        let strength = parse_field("strength", strength, |v| v.parse::<u32>().ok())?;
        let claimed = parse_field("value", claimed, |v| v.parse::<usize>().ok())?;

        let parts: Vec<&str> = body.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(ScoreError::Malformed(s.to_string()));
        }
        let time = parse_field("time", parts[0], |v| {
            DateTime::parse_from_rfc3339(v)
                .ok()
                .map(|t| t.with_timezone(&Utc))
        })?;
        let port = parse_field("port", parts[2], |v| v.parse::<u16>().ok())?;
        let suffixes: Vec<String> = parts[4..].iter().map(|v| v.to_string()).collect();
        if suffixes.len() != claimed {
            return Err(ScoreError::ValueMismatch {
                claimed,
                actual: suffixes.len(),
            });
        }
        Ok(Score::new(time, parts[1], port, parts[3], strength).with_suffixes(suffixes))
    }
}
