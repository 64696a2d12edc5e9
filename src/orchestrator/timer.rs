//! Cancellable single-slot countdown timer
//!
//! Backs the auto-resume delay after an auto-pause. The orchestrator owns
//! exactly one slot: scheduling cancels any previously pending countdown, and
//! cancellation is idempotent. Cancellation works by dropping the sender half
//! of a channel the timer thread blocks on, which wakes it immediately.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Single-slot cancellable timer
pub struct CountdownTimer {
    cancel_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            cancel_tx: None,
            handle: None,
        }
    }

    /// Schedule `on_fire` to run after `delay`, replacing any pending timer
    ///
    /// The callback runs on a dedicated thread and must not call back into
    /// this timer (cancellation joins the thread).
    pub fn schedule<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let (tx, rx) = bounded::<()>(1);
        let handle = thread::spawn(move || {
            // A dropped sender wakes the wait without firing
            if rx.recv_timeout(delay) == Err(RecvTimeoutError::Timeout) {
                on_fire();
            }
        });

        self.cancel_tx = Some(tx);
        self.handle = Some(handle);
    }

    /// Cancel the pending timer, if any
    ///
    /// Idempotent; joins the timer thread so no callback can run after this
    /// returns.
    pub fn cancel(&mut self) {
        self.cancel_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether a countdown is currently pending
    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
