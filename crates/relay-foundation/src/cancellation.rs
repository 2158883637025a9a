//! Cooperative cancellation for bounded mutations
//!
//! A mutation runs until it reaches its point of no return, where it calls
//! [`CancellationFlag::enter_commit`] and then writes. A timeout calls
//! [`CancellationFlag::cancel`]. Exactly one of the two wins: a cancelled
//! mutation must leave the tree unchanged, a committing one must finish.

use crate::error::{RelayError, RelayResult};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const RUNNING: u8 = 0;
const CANCELLED: u8 = 1;
const COMMITTING: u8 = 2;

/// Shared between a bounded mutation and the timer that bounds it
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    state: Arc<AtomicU8>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the mutation to stop.
    ///
    /// Returns `false` when the mutation already passed its point of no
    /// return and will complete.
    pub fn cancel(&self) -> bool {
        match self
            .state
            .compare_exchange(RUNNING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(current) => current == CANCELLED,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    /// Fail fast while planning
    pub fn check(&self) -> RelayResult<()> {
        if self.is_cancelled() {
            return Err(RelayError::cancelled());
        }
        Ok(())
    }

    /// Claim the right to write. Calling it again after a successful claim is a no-op.
    pub fn enter_commit(&self) -> RelayResult<()> {
        match self
            .state
            .compare_exchange(RUNNING, COMMITTING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(()),
            Err(COMMITTING) => Ok(()),
            Err(_) => Err(RelayError::cancelled()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_before_commit_wins() {
        let flag = CancellationFlag::new();
        assert!(flag.check().is_ok());
        assert!(flag.cancel());
        assert!(flag.is_cancelled());
        assert!(flag.check().is_err());
        assert_eq!(flag.enter_commit(), Err(RelayError::cancelled()));
    }

    #[test]
    fn test_commit_before_cancel_wins() {
        let flag = CancellationFlag::new();
        let timer = flag.clone();
        flag.enter_commit().unwrap();
        flag.enter_commit().unwrap();
        assert!(!timer.cancel());
        assert!(!flag.is_cancelled());
    }
}
