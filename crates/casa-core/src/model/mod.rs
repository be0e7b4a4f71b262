// ── Device model ──
//
// Typed representation of everything the remote reports. Wire spelling
// (camelCase keys, `"on"`/`"off"`) is handled by serde attributes here;
// conversion from raw events lives in `crate::convert`.

pub mod address;
pub mod device;
pub mod room;

// ── Re-exports ──────────────────────────────────────────────────────

pub use address::{DeviceId, RoomId};
pub use device::{AirConditioning, CurtainPosition, Fan, Fridge, Power, Stove, Television};
pub use room::{
    Bedroom, BedroomDevice, DeviceStates, DeviceUpdate, Kitchen, KitchenDevice, LivingRoom,
    LivingRoomDevice,
};
