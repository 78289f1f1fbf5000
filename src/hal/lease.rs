//! Exclusive channel leases
//!
//! A [`ChannelArbiter`] owns the table of leased channels. Handles created
//! from the same arbiter share that table, so a second controller starting on
//! a channel that is already sounding gets [`BuzzerError::ChannelBusy`]
//! instead of silently fighting over the output.

use super::ChannelId;
use crate::{BuzzerError, Result};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Shared table of leased channels
#[derive(Debug, Clone, Default)]
pub struct ChannelArbiter {
    leased: Arc<Mutex<BTreeSet<ChannelId>>>,
}

impl ChannelArbiter {
    /// Create an arbiter with no channels leased
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `id` that leases through this arbiter
    pub fn channel(&self, id: ChannelId) -> Channel {
        Channel {
            id,
            arbiter: self.clone(),
        }
    }

    /// True if some controller currently holds `id`
    pub fn is_leased(&self, id: ChannelId) -> bool {
        self.leased.lock().contains(&id)
    }

    /// Number of channels currently leased
    pub fn leased_count(&self) -> usize {
        self.leased.lock().len()
    }

    fn acquire(&self, id: ChannelId) -> Result<ChannelLease> {
        let mut leased = self.leased.lock();
        if !leased.insert(id) {
            return Err(BuzzerError::ChannelBusy(id));
        }
        Ok(ChannelLease {
            id,
            arbiter: self.clone(),
        })
    }

    fn release(&self, id: ChannelId) {
        self.leased.lock().remove(&id);
    }
}

/// Handle naming the output line a controller drives
#[derive(Debug, Clone)]
pub struct Channel {
    id: ChannelId,
    arbiter: ChannelArbiter,
}

impl Channel {
    /// Standalone handle with its own private arbiter
    ///
    /// Leases still prevent a controller from double-booking the handle, but
    /// nothing is shared with other handles. Use [`ChannelArbiter::channel`]
    /// when several controllers share one output.
    pub fn new(id: ChannelId) -> Self {
        ChannelArbiter::new().channel(id)
    }

    /// Channel identifier passed to the output driver
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Arbiter this handle leases through
    pub fn arbiter(&self) -> &ChannelArbiter {
        &self.arbiter
    }

    /// Take exclusive use of the channel until the lease is dropped
    pub fn try_lease(&self) -> Result<ChannelLease> {
        self.arbiter.acquire(self.id)
    }

    /// True if any controller currently holds this channel
    pub fn is_leased(&self) -> bool {
        self.arbiter.is_leased(self.id)
    }
}

/// Proof of exclusive use of a channel; released on drop
#[derive(Debug)]
pub struct ChannelLease {
    id: ChannelId,
    arbiter: ChannelArbiter,
}

impl ChannelLease {
    /// Leased channel
    pub fn id(&self) -> ChannelId {
        self.id
    }
}

impl Drop for ChannelLease {
    fn drop(&mut self) {
        self.arbiter.release(self.id);
    }
}
