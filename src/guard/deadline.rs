//! "Run this, give up past N" primitive
//!
//! The work runs on a dedicated thread. The caller waits on a bounded channel
//! and stops waiting when the deadline passes; the thread is then detached.
//! Stopping it is the caller's job (see `CancelFlag`).

use std::any::Any;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Why no result came back
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeadlineError {
    #[error("deadline of {0:?} exceeded")]
    Elapsed(Duration),

    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("failed to spawn worker: {0}")]
    Spawn(String),
}

/// Runs `work` on a worker thread and waits at most `deadline` for it.
pub fn run_with_deadline<T, F>(deadline: Duration, work: F) -> Result<T, DeadlineError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    let handle = thread::Builder::new()
        .name("sqljudge-worker".into())
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(work());
        })
        .map_err(|e| DeadlineError::Spawn(e.to_string()))?;

    match rx.recv_timeout(deadline) {
        Ok(value) => Ok(value),
        Err(RecvTimeoutError::Timeout) => Err(DeadlineError::Elapsed(deadline)),
        Err(RecvTimeoutError::Disconnected) => match handle.join() {
            Err(payload) => Err(DeadlineError::Panicked(panic_message(payload.as_ref()))),
            Ok(()) => Err(DeadlineError::Panicked(
                "worker exited without a result".to_string(),
            )),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
