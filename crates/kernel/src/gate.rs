use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::status::{GameStatus, StatusError, StatusTransition};

/// Holds the game status and blocks callers until the surface is ready.
///
/// Waiters sleep on a condition variable that is notified on every status
/// change, so they wake exactly when the status first leaves `NotReady`. The
/// poll slice only bounds how long a single wait lasts between progress logs.
#[derive(Debug)]
pub struct ReadinessGate {
    status: Mutex<GameStatus>,
    changed: Condvar,
    poll: Duration,
}

impl ReadinessGate {
    pub fn new(poll: Duration) -> Self {
        Self {
            status: Mutex::new(GameStatus::NotReady),
            changed: Condvar::new(),
            poll,
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current status, without waiting.
    pub fn get(&self) -> GameStatus {
        *self.lock()
    }

    /// Run `transition` through the status machine and publish the result.
    /// On error the status is left untouched.
    pub fn apply(&self, transition: StatusTransition) -> Result<GameStatus, StatusError> {
        let mut status = self.lock();
        let from = *status;
        let next = from.apply(transition)?;
        if from != next {
            tracing::debug!(%from, to = %next, "game status changed");
        }
        *status = next;
        drop(status);
        self.changed.notify_all();
        Ok(next)
    }

    /// Block until the status is no longer `NotReady`, then return it.
    pub fn wait_ready(&self) -> GameStatus {
        let mut status = self.lock();
        while !status.is_ready() {
            let (guard, timeout) = self
                .changed
                .wait_timeout(status, self.poll)
                .unwrap_or_else(PoisonError::into_inner);
            status = guard;
            if timeout.timed_out() && !status.is_ready() {
                tracing::trace!("still waiting for the drawing surface");
            }
        }
        *status
    }
}
