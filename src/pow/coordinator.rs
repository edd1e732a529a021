use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::error::PowError;
use super::search::{Puzzle, Scan};

/// Runs one sequential scan per worker thread, each from its own random
/// offset, and returns the first winner.
#[derive(Debug, Clone)]
pub struct Coordinator {
    threads: usize,
    deadline: Option<Duration>,
    max_trials: Option<u64>,
}

/// Write-once result slot shared by the workers of one `run` call.
#[derive(Debug, Default)]
pub struct Latch {
    done: AtomicBool,
    state: Mutex<LatchState>,
    signal: Condvar,
}

#[derive(Debug, Default)]
struct LatchState {
    winner: Option<String>,
    exited: usize,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock-free check used by workers before every trial.
    pub fn is_set(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Record `value` if nothing was recorded yet. Returns whether this call won.
    pub fn offer(&self, value: String) -> bool {
        let mut state = self.lock();
        if state.winner.is_some() {
            return false;
        }
        state.winner = Some(value);
        self.done.store(true, Ordering::Release);
        self.signal.notify_all();
        true
    }

    pub fn winner(&self) -> Option<String> {
        self.lock().winner.clone()
    }

    /// Stop the workers without recording a winner.
    fn close(&self) {
        self.done.store(true, Ordering::Release);
    }

    fn worker_exited(&self) {
        self.lock().exited += 1;
        self.signal.notify_all();
    }

    /// Block until a winner is recorded or `workers` workers have exited.
    fn wait(&self, workers: usize) -> Option<String> {
        let mut state = self.lock();
        while state.winner.is_none() && state.exited < workers {
            state = match self.signal.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        state.winner.clone()
    }

    // Workers never panic while holding the lock, the data stays consistent.
    fn lock(&self) -> MutexGuard<'_, LatchState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Counts a worker as exited even when it unwinds.
struct ExitGuard<'a>(&'a Latch);

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.0.worker_exited();
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    /// One worker per available hardware thread, no deadline, no trial cap.
    pub fn new() -> Self {
        let threads = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            threads,
            deadline: None,
            max_trials: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cap on trials per worker.
    pub fn with_max_trials(mut self, max_trials: u64) -> Self {
        self.max_trials = Some(max_trials);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn max_trials(&self) -> Option<u64> {
        self.max_trials
    }

    /// Race the workers and return the encoding of the first winning nonce.
    ///
    /// All workers are joined before returning. Without a deadline or trial
    /// cap this only returns on a match.
    pub fn run(&self, puzzle: &Puzzle) -> Result<String, PowError> {
        let started = Instant::now();
        let offsets = self.offsets();
        let stop_at = self.deadline.map(|d| started + d);
        let latch = Latch::new();

        debug!(
            "POW - {} workers, strength {}, encoding {}, prefix {:?}",
            offsets.len(),
            puzzle.strength(),
            puzzle.encoding(),
            puzzle.prefix()
        );

        let outcome = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(offsets.len());
            for (i, &start) in offsets.iter().enumerate() {
                let latch = &latch;
                let limit = self.max_trials.map(|cap| start.saturating_add(cap));
                let spawned = thread::Builder::new()
                    .name(format!("pow-worker-{i}"))
                    .spawn_scoped(scope, move || {
                        let _exit = ExitGuard(latch);
                        let hit = puzzle.scan(start, limit, || {
                            latch.is_set() || stop_at.is_some_and(|t| Instant::now() >= t)
                        });
                        if let Scan::Found(nonce) = hit {
                            if latch.offer(puzzle.encoding().encode(nonce)) {
                                debug!("POW - worker {i} won with nonce {nonce:#x}");
                            } else {
                                debug!("POW - worker {i} also found {nonce:#x}, discarded");
                            }
                        }
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        warn!("POW - could not spawn worker {i}: {e}");
                        latch.close();
                        join_all(handles);
                        return after_spawn_failure(latch, e);
                    }
                }
            }

            let winner = latch.wait(handles.len());
            latch.close();
            if !join_all(handles) {
                return Err(PowError::WorkerPanicked);
            }
            Ok(winner)
        })?;

        let elapsed = started.elapsed();
        match outcome {
            Some(encoded) => {
                debug!("POW - solved in {elapsed:?}: {encoded}");
                Ok(encoded)
            }
            None => match self.deadline {
                Some(d) if elapsed >= d => Err(PowError::DeadlineExceeded(d)),
                _ => Err(PowError::Exhausted {
                    workers: offsets.len(),
                    trials_per_worker: self.max_trials.unwrap_or(u64::MAX),
                }),
            },
        }
    }

    /// Independent start offsets, one per worker, from a time-seeded source.
    fn offsets(&self) -> Vec<u64> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let mut rng = StdRng::seed_from_u64(seed);
        (0..self.threads).map(|_| rng.next_u64()).collect()
    }
}

/// A worker that already won before a later spawn failed still counts.
fn after_spawn_failure(latch: &Latch, e: std::io::Error) -> Result<Option<String>, PowError> {
    match latch.winner() {
        Some(winner) => {
            debug!("POW - keeping winner {winner} despite spawn failure");
            Ok(Some(winner))
        }
        None => Err(PowError::Spawn(e)),
    }
}

/// Join every handle; false when any of them panicked.
fn join_all(handles: Vec<thread::ScopedJoinHandle<'_, ()>>) -> bool {
    let mut ok = true;
    for handle in handles {
        ok &= handle.join().is_ok();
    }
    ok
}
