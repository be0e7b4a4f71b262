// ── Reactive device store ──
//
// Holds the single client-side snapshot and pushes every change to
// subscribers through a `watch` channel.

mod device_store;

pub use device_store::DeviceStore;
