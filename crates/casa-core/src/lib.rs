// casa-core: Device model, reactive state store and remote client.
//
// Sits between `casa-api` (wire) and the TUI. Owns the single
// client-side snapshot of every device in the house and keeps it in
// sync with the remote over a Socket.IO session.

pub mod config;
pub mod convert;
pub mod error;
pub mod intent;
pub mod model;
pub mod remote;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────
pub use config::RemoteConfig;
pub use error::CoreError;
pub use intent::{Setting, Step};
pub use remote::{ConnectionState, Remote};
pub use store::DeviceStore;
pub use stream::{Snapshot, SnapshotStream};

// Model re-exports
pub use model::{
    AirConditioning, Bedroom, BedroomDevice, CurtainPosition, DeviceId, DeviceStates, DeviceUpdate,
    Fan, Fridge, Kitchen, KitchenDevice, LivingRoom, LivingRoomDevice, Power, RoomId, Stove,
    Television,
};
