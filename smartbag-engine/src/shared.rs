//! Session handle for callers that step from more than one thread.
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::BaggingError;
use crate::event::PlacementEvent;
use crate::session::BaggingSession;

/// Serializes steps against one session. Each `place_next` holds the lock
/// from reading the cursor until the new session is stored, so concurrent
/// callers can neither skip nor repeat an item.
#[derive(Debug)]
pub struct SharedSession {
    inner: Mutex<BaggingSession>,
}

impl SharedSession {
    #[must_use]
    pub fn new(session: BaggingSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    // A step only writes after it fully succeeds, so a poisoned lock still
    // guards a consistent session.
    fn lock(&self) -> MutexGuard<'_, BaggingSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place the next item and store the resulting session.
    ///
    /// # Errors
    ///
    /// Returns [`BaggingError::NoMoreItems`] once every item has been placed.
    pub fn place_next(&self) -> Result<PlacementEvent, BaggingError> {
        let mut guard = self.lock();
        let step = guard.place_next()?;
        *guard = step.session;
        Ok(step.event)
    }

    /// Copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> BaggingSession {
        self.lock().clone()
    }

    #[must_use]
    pub fn into_inner(self) -> BaggingSession {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
