// ── Device addressing ──
//
// A device is identified by its (room, device-name) pair. Both halves use
// the remote's wire spelling; display labels live here too so every
// consumer names things the same way.

use std::fmt;

/// One of the three rooms of the house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomId {
    LivingRoom,
    Kitchen,
    /// The bedroom. The remote calls it `room`.
    Room,
}

impl RoomId {
    pub const ALL: [RoomId; 3] = [Self::LivingRoom, Self::Kitchen, Self::Room];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::LivingRoom => "livingRoom",
            Self::Kitchen => "kitchen",
            Self::Room => "room",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|room| room.wire_name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LivingRoom => "Living Room",
            Self::Kitchen => "Kitchen",
            Self::Room => "Bedroom",
        }
    }

    /// Devices of this room, in display order.
    pub fn devices(self) -> impl Iterator<Item = DeviceId> {
        DeviceId::ALL.into_iter().filter(move |d| d.room() == self)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One of the nine addressable devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceId {
    LivingRoomLights,
    Tv,
    AirConditioning,
    KitchenLights,
    Fridge,
    Stove,
    RoomLights,
    Fan,
    Curtains,
}

impl DeviceId {
    pub const ALL: [DeviceId; 9] = [
        Self::LivingRoomLights,
        Self::Tv,
        Self::AirConditioning,
        Self::KitchenLights,
        Self::Fridge,
        Self::Stove,
        Self::RoomLights,
        Self::Fan,
        Self::Curtains,
    ];

    pub fn room(self) -> RoomId {
        match self {
            Self::LivingRoomLights | Self::Tv | Self::AirConditioning => RoomId::LivingRoom,
            Self::KitchenLights | Self::Fridge | Self::Stove => RoomId::Kitchen,
            Self::RoomLights | Self::Fan | Self::Curtains => RoomId::Room,
        }
    }

    /// Device name within its room, as the remote spells it.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::LivingRoomLights | Self::KitchenLights | Self::RoomLights => "lights",
            Self::Tv => "tv",
            Self::AirConditioning => "airConditioning",
            Self::Fridge => "fridge",
            Self::Stove => "stove",
            Self::Fan => "fan",
            Self::Curtains => "curtains",
        }
    }

    pub fn from_wire(room: &str, device: &str) -> Option<Self> {
        let room = RoomId::from_wire(room)?;
        room.devices().find(|d| d.wire_name() == device)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LivingRoomLights | Self::KitchenLights | Self::RoomLights => "Lights",
            Self::Tv => "TV",
            Self::AirConditioning => "Air conditioning",
            Self::Fridge => "Fridge",
            Self::Stove => "Stove",
            Self::Fan => "Fan",
            Self::Curtains => "Curtains",
        }
    }

    /// Whether the device has an on/off (or open/closed) switch.
    pub fn is_switchable(self) -> bool {
        self != Self::Fridge
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.room(), self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_device_round_trips_through_wire_names() {
        for id in DeviceId::ALL {
            assert_eq!(
                DeviceId::from_wire(id.room().wire_name(), id.wire_name()),
                Some(id)
            );
        }
    }

    #[test]
    fn lights_resolve_per_room() {
        assert_eq!(DeviceId::from_wire("kitchen", "lights"), Some(DeviceId::KitchenLights));
        assert_eq!(DeviceId::from_wire("room", "lights"), Some(DeviceId::RoomLights));
    }

    #[test]
    fn unknown_pairs_are_rejected() {
        assert_eq!(DeviceId::from_wire("kitchen", "tv"), None);
        assert_eq!(DeviceId::from_wire("garage", "lights"), None);
    }

    #[test]
    fn three_devices_per_room() {
        for room in RoomId::ALL {
            assert_eq!(room.devices().count(), 3, "{room}");
        }
    }

    #[test]
    fn display_uses_wire_path() {
        assert_eq!(DeviceId::AirConditioning.to_string(), "livingRoom.airConditioning");
    }
}
