// ── Device snapshot store ──
//
// At most one snapshot exists at a time. It is absent until the first
// `initialState`, replaced per device by pushes, and cleared on disconnect.
// Only the session task writes; any number of readers may subscribe.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{DeviceStates, DeviceUpdate};
use crate::stream::{Snapshot, SnapshotStream};

pub struct DeviceStore {
    snapshot: watch::Sender<Snapshot>,
}

impl DeviceStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        Self { snapshot }
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Replace the whole snapshot.
    pub fn replace(&self, states: DeviceStates) {
        self.snapshot.send_replace(Some(Arc::new(states)));
    }

    /// Replace one device sub-state.
    ///
    /// Returns `false` (and changes nothing) while no snapshot is held:
    /// there is nothing to apply the update to.
    pub fn apply(&self, update: DeviceUpdate) -> bool {
        self.snapshot.send_if_modified(|current| match current {
            Some(states) => {
                *states = Arc::new(states.apply(update));
                true
            }
            None => false,
        })
    }

    /// Drop the snapshot. Notifies subscribers only if one was held.
    pub fn clear(&self) {
        self.snapshot.send_if_modified(|current| current.take().is_some());
    }

    // ── Readers ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{BedroomDevice, CurtainPosition, KitchenDevice, Power};
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_empty() {
        let store = DeviceStore::new();
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn apply_before_snapshot_is_dropped() {
        let store = DeviceStore::new();
        let applied = store.apply(DeviceUpdate::Kitchen(KitchenDevice::Lights(Power::On)));
        assert!(!applied);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn apply_replaces_one_device() {
        let store = DeviceStore::new();
        store.replace(DeviceStates::default());

        assert!(store.apply(DeviceUpdate::Room(BedroomDevice::Curtains(CurtainPosition::Open))));

        let snap = store.snapshot().unwrap();
        assert_eq!(snap.room.curtains, CurtainPosition::Open);
        assert_eq!(snap.kitchen, DeviceStates::default().kitchen);
    }

    #[test]
    fn clear_drops_snapshot() {
        let store = DeviceStore::new();
        store.replace(DeviceStates::default());
        store.clear();
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_every_write() {
        let store = DeviceStore::new();
        let mut stream = store.subscribe();
        assert!(stream.latest().is_none());

        store.replace(DeviceStates::default());
        let snap = stream.changed().await.unwrap();
        assert!(snap.is_some());

        store.clear();
        assert_eq!(stream.changed().await.unwrap(), None);
    }

    #[test]
    fn pending_subscriber_is_woken_by_a_push() {
        let store = DeviceStore::new();
        store.replace(DeviceStates::default());
        let mut stream = store.subscribe();

        let mut changed = tokio_test::task::spawn(stream.changed());
        tokio_test::assert_pending!(changed.poll());

        store.apply(DeviceUpdate::Kitchen(KitchenDevice::Lights(Power::On)));
        assert!(changed.is_woken());
        let snap = tokio_test::assert_ready!(changed.poll()).unwrap().unwrap();
        assert!(snap.kitchen.lights.is_on());
    }

    #[test]
    fn clearing_an_empty_store_does_not_notify() {
        let store = DeviceStore::new();
        let mut stream = store.subscribe();
        let mut changed = tokio_test::task::spawn(stream.changed());
        tokio_test::assert_pending!(changed.poll());

        store.clear();
        assert!(!changed.is_woken());
        tokio_test::assert_pending!(changed.poll());
    }
}
