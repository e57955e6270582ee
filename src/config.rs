use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::SortError;

/// Slices shorter than this are sorted sequentially instead of being split further.
pub const DEFAULT_THRESHOLD: usize = 500;

/// Below two a length-1 buffer would split into an empty and a length-1 half forever.
pub const MIN_THRESHOLD: usize = 2;

pub const DEFAULT_THREAD_NAME_PREFIX: &str = "fork-join-sort";

pub const THRESHOLD_ENV: &str = "FORK_JOIN_SORT_THRESHOLD";
pub const WORKERS_ENV: &str = "FORK_JOIN_SORT_WORKERS";

/// Shared flag a caller can flip to stop a running sort at its next fork.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Tuning knobs for a parallel sort.
///
/// ```ignore
/// let config = SortConfig::default().with_threshold(2_000).with_workers(4);
/// ParallelMergeSort::new(config)?.sort(&mut v)?;
/// ```
#[derive(Clone, Debug)]
pub struct SortConfig {
    threshold: usize,
    workers: Option<usize>,
    thread_name_prefix: String,
    cancel: Option<CancelToken>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            workers: None,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.into(),
            cancel: None,
        }
    }
}

impl SortConfig {
    /// Defaults, overridden by `FORK_JOIN_SORT_THRESHOLD` and `FORK_JOIN_SORT_WORKERS` if set.
    pub fn from_env() -> Result<Self, SortError> {
        let mut config = Self::default();

        if let Some(threshold) = parse_env_var(THRESHOLD_ENV)? {
            config.threshold = threshold;
        }
        if let Some(workers) = parse_env_var(WORKERS_ENV)? {
            config.workers = Some(workers);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Worker count the pool will be built with, one per available core unless set.
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    pub fn thread_name_prefix(&self) -> &str {
        &self.thread_name_prefix
    }

    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    pub fn validate(&self) -> Result<(), SortError> {
        check_threshold(self.threshold)?;
        self.validate_workers()
    }

    /// The part of [`SortConfig::validate`] a pool depends on.
    pub(crate) fn validate_workers(&self) -> Result<(), SortError> {
        if self.workers == Some(0) {
            return Err(SortError::InvalidInput(
                "worker count must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

pub(crate) fn check_threshold(threshold: usize) -> Result<(), SortError> {
    if threshold < MIN_THRESHOLD {
        return Err(SortError::InvalidInput(format!(
            "threshold must be at least {MIN_THRESHOLD}, got {threshold}"
        )));
    }

    Ok(())
}

fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, SortError> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| SortError::InvalidInput(format!("{name}={val:?} is not a valid number"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(SortError::InvalidInput(format!(
            "{name} is not valid unicode"
        ))),
    }
}
