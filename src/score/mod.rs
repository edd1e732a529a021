pub mod error;
pub mod model;

pub use error::ScoreError;
pub use model::Score;

/// Default strength of a node score.
pub const DEFAULT_STRENGTH: u32 = 8;

/// Scores older than this are expired.
pub const SCORE_LIFETIME_HOURS: i64 = 24;

/// Invoice used when the node has none configured.
pub const DEFAULT_INVOICE: &str = "NOPREFIX@ffffffffffffffff";
