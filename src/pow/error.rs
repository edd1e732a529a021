use thiserror::Error;

#[derive(Debug, Error)]
pub enum PowError {
    /// No 32-byte digest has more than 64 trailing zero hex digits.
    #[error("strength {strength} is unsatisfiable (max {max})")]
    UnsatisfiableStrength { strength: u32, max: u32 },

    /// A bounded search ran out of counters without a match.
    #[error("no nonce found in {start:#x}..{limit:#x}")]
    NotFound { start: u64, limit: u64 },

    /// Every parallel worker used up its trial cap without a match.
    #[error("no nonce found by {workers} workers after {trials_per_worker} trials each")]
    Exhausted { workers: usize, trials_per_worker: u64 },

    /// Every worker stopped at the deadline without a match.
    #[error("search deadline of {0:?} exceeded")]
    DeadlineExceeded(std::time::Duration),

    #[error("failed to spawn search worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("search worker panicked")]
    WorkerPanicked,
}
