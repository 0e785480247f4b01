use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use rand::rngs::StdRng;

use crate::{random, CommandError, CommandResult};

/// A cancellation signal that can be shared across threads.
///
/// Cloned tokens observe the same signal. Once cancelled, a token cannot be
/// reset.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Context for a single pipeline run.
///
/// Carries the run's cancellation signal and random source configuration.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    cancellation: CancellationToken,
    seed: Option<u64>,
}

impl ExecutionContext {
    /// Constructs a context with a fresh cancellation signal and OS-seeded
    /// randomness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes all random sources in the run derive from a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Uses an externally owned cancellation signal.
    ///
    /// This allows callers to cancel a run from another thread.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns the run's random seed, if overridden.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns a handle to the run's cancellation signal.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Cancels the run.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Returns [`CommandError::Cancelled`] if the run has been cancelled.
    pub fn checkpoint(&self) -> CommandResult {
        match self.is_cancelled() {
            true => Err(CommandError::Cancelled),
            false => Ok(()),
        }
    }

    /// Returns the context of a single stage within the run.
    pub fn stage(&self, index: usize) -> StageContext<'_> {
        StageContext {
            execution: self,
            index,
        }
    }
}

/// The view of an [`ExecutionContext`] held by one pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    execution: &'a ExecutionContext,
    index: usize,
}

impl<'a> StageContext<'a> {
    /// Returns the stage's zero-based position in the pipeline.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn execution(&self) -> &'a ExecutionContext {
        self.execution
    }

    pub fn is_cancelled(&self) -> bool {
        self.execution.is_cancelled()
    }

    /// Returns [`CommandError::Cancelled`] if the run has been cancelled.
    pub fn checkpoint(&self) -> CommandResult {
        self.execution.checkpoint()
    }

    /// Returns a random generator owned by this stage.
    ///
    /// An explicit `source` file takes precedence over the run's seed. Without
    /// either, the generator is seeded from OS entropy.
    pub fn random(&self, source: Option<&Path>) -> CommandResult<StdRng> {
        match source {
            Some(path) => random::from_source_file(path),
            None => Ok(random::from_seed(
                self.execution
                    .seed
                    .map(|seed| seed.wrapping_add(self.index as u64)),
            )),
        }
    }
}
