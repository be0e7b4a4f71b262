// ── Reactive snapshot stream ──
//
// Subscription type for consuming snapshot changes from the DeviceStore.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::DeviceStates;

/// The client-side copy of the remote's state; `None` until the first
/// `initialState` arrives and again after every disconnect.
pub type Snapshot = Option<Arc<DeviceStates>>;

/// A subscription to the device snapshot.
pub struct SnapshotStream {
    receiver: watch::Receiver<Snapshot>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        Self { receiver }
    }

    /// The latest snapshot, without marking it seen.
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}
