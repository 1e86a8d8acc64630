//! Session-scoped state.
//!
//! [`SessionLedger`] is the per-session context threaded through every
//! pipeline call as `&mut`, which is enough to serialize attempts when one
//! task owns the session. [`Session`] wraps it for hosts that hand the same
//! session to several tasks: a second attempt while one is running fails
//! with [`MimirError::AttemptInProgress`](crate::MimirError::AttemptInProgress)
//! instead of queuing.

mod ledger;

pub use ledger::{DEFAULT_MAX_USAGE, HistoryEntry, SessionLedger};

use tokio::sync::{Mutex, MutexGuard};

use crate::{MimirError, Result};

/// A ledger that can be shared between tasks.
#[derive(Debug, Default)]
pub struct Session {
    ledger: Mutex<SessionLedger>,
}

impl Session {
    pub fn new(ledger: SessionLedger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
        }
    }

    /// Exclusive access for one attempt. Fails if another attempt holds it.
    pub fn begin(&self) -> Result<MutexGuard<'_, SessionLedger>> {
        self.ledger
            .try_lock()
            .map_err(|_| MimirError::AttemptInProgress)
    }

    /// Wait for any running attempt, then take a copy of the ledger.
    pub async fn snapshot(&self) -> SessionLedger {
        self.ledger.lock().await.clone()
    }

    pub fn into_inner(self) -> SessionLedger {
        self.ledger.into_inner()
    }
}
