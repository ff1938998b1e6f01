//! One-shot startup rendezvous for the worker loops

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Notify;
use tracing::debug;

use super::error::PlayError;
use super::messages::Role;

struct BarrierShared {
    required: usize,
    arrived: AtomicUsize,
    broken: AtomicBool,
    notify: Notify,
}

/// Rendezvous that releases every party once `required` of them have arrived
///
/// Each loop gets its own [`BarrierParty`]. A party that is dropped without
/// arriving (its task panicked or was aborted during setup) breaks the barrier,
/// and everyone still waiting gets [`PlayError::BarrierBroken`] instead of
/// hanging.
pub struct StartupBarrier {
    shared: Arc<BarrierShared>,
}

impl StartupBarrier {
    pub fn new(required: usize) -> Self {
        debug!(%required, "StartupBarrier::new: called");
        Self {
            shared: Arc::new(BarrierShared {
                required,
                arrived: AtomicUsize::new(0),
                broken: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Hand out the arrival ticket for one loop
    pub fn party(&self, role: Role) -> BarrierParty {
        debug!(%role, "StartupBarrier::party: called");
        BarrierParty {
            role,
            shared: self.shared.clone(),
            arrived: false,
        }
    }

    /// Number of parties that have arrived so far
    pub fn arrived(&self) -> usize {
        self.shared.arrived.load(Ordering::SeqCst)
    }

    pub fn is_broken(&self) -> bool {
        self.shared.broken.load(Ordering::SeqCst)
    }
}

/// Arrival ticket held by a single worker loop
pub struct BarrierParty {
    role: Role,
    shared: Arc<BarrierShared>,
    arrived: bool,
}

impl BarrierParty {
    pub fn role(&self) -> Role {
        self.role
    }

    /// Arrive and wait for the rest of the parties
    pub async fn wait(mut self) -> Result<(), PlayError> {
        debug!(role = %self.role, "BarrierParty::wait: called");
        self.arrived = true;
        let shared = &self.shared;
        let arrived = shared.arrived.fetch_add(1, Ordering::SeqCst) + 1;

        if arrived >= shared.required {
            debug!(role = %self.role, %arrived, "BarrierParty::wait: last to arrive, releasing");
            shared.notify.notify_waiters();
            return Ok(());
        }

        loop {
            let notified = shared.notify.notified();
            tokio::pin!(notified);
            // Register before re-checking so a release between the check and the await is not lost
            notified.as_mut().enable();

            if shared.arrived.load(Ordering::SeqCst) >= shared.required {
                debug!(role = %self.role, "BarrierParty::wait: released");
                return Ok(());
            }
            if shared.broken.load(Ordering::SeqCst) {
                debug!(role = %self.role, "BarrierParty::wait: barrier broken");
                return Err(PlayError::BarrierBroken { role: self.role });
            }

            notified.await;
        }
    }
}

impl Drop for BarrierParty {
    fn drop(&mut self) {
        if !self.arrived {
            debug!(role = %self.role, "BarrierParty::drop: dropped before arriving");
            self.shared.broken.store(true, Ordering::SeqCst);
            self.shared.notify.notify_waiters();
        }
    }
}
