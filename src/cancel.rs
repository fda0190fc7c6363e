//! Cooperative cancellation shared between a check and its worker
//!
//! The deadline guard cannot kill a worker thread. Instead it raises a
//! `CancelFlag` that every long-running step polls: the permutation search
//! stops enumerating and engines abandon the statement in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A clonable, one-way cancellation flag
///
/// Clones share state. Once raised, a flag stays raised.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    raised: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of all work holding a clone of this flag
    pub fn cancel(&self) {
        self.raised.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
