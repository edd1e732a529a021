use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("malformed score: {0}")]
    Malformed(String),

    #[error("invalid {field} in score: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("score claims {claimed} suffixes but carries {actual}")]
    ValueMismatch { claimed: usize, actual: usize },
}
