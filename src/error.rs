use std::any::Any;
use std::collections::TryReserveError;

use thiserror::Error;

/// Everything that can stop a parallel sort before the slice is fully sorted.
///
/// Apart from `InvalidInput`, which is reported before any work starts, the slice is left in an
/// unspecified state when an error is returned.
#[derive(Debug, Error)]
pub enum SortError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to allocate a child buffer of {len} elements")]
    AllocationFailure {
        len: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("worker fault: {0}")]
    WorkerFault(String),

    #[error("failed to build the worker pool")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    #[error("sort was cancelled")]
    Cancelled,
}

impl SortError {
    /// Turns a payload captured by `catch_unwind` into a `WorkerFault`.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };

        SortError::WorkerFault(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payload_str() {
        let err = SortError::from_panic(Box::new("comparator exploded"));
        assert!(matches!(err, SortError::WorkerFault(ref m) if m == "comparator exploded"));
    }

    #[test]
    fn panic_payload_string() {
        let err = SortError::from_panic(Box::new(format!("bad value {}", 7)));
        assert_eq!(err.to_string(), "worker fault: bad value 7");
    }

    #[test]
    fn panic_payload_other() {
        let err = SortError::from_panic(Box::new(42_u32));
        assert!(matches!(err, SortError::WorkerFault(ref m) if m == "unknown panic payload"));
    }

    #[test]
    fn allocation_failure_keeps_source() {
        use std::error::Error as _;

        let source = Vec::<u64>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = SortError::AllocationFailure { len: usize::MAX, source };
        assert!(err.source().is_some());
    }
}
