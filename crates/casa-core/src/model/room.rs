// ── Rooms and the full snapshot ──
//
// Updates are tagged per room, then per device, so an update can only
// carry the sub-state shape its device actually has. Each room has a
// total `with` function and `DeviceStates::apply` routes to it; both
// return new values and leave every other field untouched.

use serde::{Deserialize, Serialize};

use super::address::DeviceId;
use super::device::{AirConditioning, CurtainPosition, Fan, Fridge, Power, Stove, Television};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivingRoom {
    pub lights: Power,
    pub tv: Television,
    pub air_conditioning: AirConditioning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kitchen {
    pub lights: Power,
    pub fridge: Fridge,
    pub stove: Stove,
}

/// The bedroom, keyed `room` by the remote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bedroom {
    pub lights: Power,
    pub fan: Fan,
    pub curtains: CurtainPosition,
}

/// The complete snapshot of every device in the house.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStates {
    pub living_room: LivingRoom,
    pub kitchen: Kitchen,
    pub room: Bedroom,
}

// ── Tagged updates ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivingRoomDevice {
    Lights(Power),
    Tv(Television),
    AirConditioning(AirConditioning),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KitchenDevice {
    Lights(Power),
    Fridge(Fridge),
    Stove(Stove),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedroomDevice {
    Lights(Power),
    Fan(Fan),
    Curtains(CurtainPosition),
}

/// A complete replacement sub-state for exactly one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceUpdate {
    LivingRoom(LivingRoomDevice),
    Kitchen(KitchenDevice),
    Room(BedroomDevice),
}

impl DeviceUpdate {
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::LivingRoom(LivingRoomDevice::Lights(_)) => DeviceId::LivingRoomLights,
            Self::LivingRoom(LivingRoomDevice::Tv(_)) => DeviceId::Tv,
            Self::LivingRoom(LivingRoomDevice::AirConditioning(_)) => DeviceId::AirConditioning,
            Self::Kitchen(KitchenDevice::Lights(_)) => DeviceId::KitchenLights,
            Self::Kitchen(KitchenDevice::Fridge(_)) => DeviceId::Fridge,
            Self::Kitchen(KitchenDevice::Stove(_)) => DeviceId::Stove,
            Self::Room(BedroomDevice::Lights(_)) => DeviceId::RoomLights,
            Self::Room(BedroomDevice::Fan(_)) => DeviceId::Fan,
            Self::Room(BedroomDevice::Curtains(_)) => DeviceId::Curtains,
        }
    }
}

// ── Total update functions ──────────────────────────────────────────

impl LivingRoom {
    #[must_use]
    pub fn with(&self, device: LivingRoomDevice) -> Self {
        match device {
            LivingRoomDevice::Lights(lights) => Self { lights, ..*self },
            LivingRoomDevice::Tv(tv) => Self { tv, ..*self },
            LivingRoomDevice::AirConditioning(air_conditioning) => Self {
                air_conditioning,
                ..*self
            },
        }
    }
}

impl Kitchen {
    #[must_use]
    pub fn with(&self, device: KitchenDevice) -> Self {
        match device {
            KitchenDevice::Lights(lights) => Self { lights, ..*self },
            KitchenDevice::Fridge(fridge) => Self { fridge, ..*self },
            KitchenDevice::Stove(stove) => Self { stove, ..*self },
        }
    }
}

impl Bedroom {
    #[must_use]
    pub fn with(&self, device: BedroomDevice) -> Self {
        match device {
            BedroomDevice::Lights(lights) => Self { lights, ..*self },
            BedroomDevice::Fan(fan) => Self { fan, ..*self },
            BedroomDevice::Curtains(curtains) => Self { curtains, ..*self },
        }
    }
}

impl DeviceStates {
    /// Return a new snapshot with one device sub-state replaced.
    #[must_use]
    pub fn apply(&self, update: DeviceUpdate) -> Self {
        match update {
            DeviceUpdate::LivingRoom(device) => Self {
                living_room: self.living_room.with(device),
                ..*self
            },
            DeviceUpdate::Kitchen(device) => Self {
                kitchen: self.kitchen.with(device),
                ..*self
            },
            DeviceUpdate::Room(device) => Self {
                room: self.room.with(device),
                ..*self
            },
        }
    }

    /// The device's current sub-state, wrapped as an update.
    pub fn current(&self, id: DeviceId) -> DeviceUpdate {
        match id {
            DeviceId::LivingRoomLights => {
                DeviceUpdate::LivingRoom(LivingRoomDevice::Lights(self.living_room.lights))
            }
            DeviceId::Tv => DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(self.living_room.tv)),
            DeviceId::AirConditioning => DeviceUpdate::LivingRoom(
                LivingRoomDevice::AirConditioning(self.living_room.air_conditioning),
            ),
            DeviceId::KitchenLights => {
                DeviceUpdate::Kitchen(KitchenDevice::Lights(self.kitchen.lights))
            }
            DeviceId::Fridge => DeviceUpdate::Kitchen(KitchenDevice::Fridge(self.kitchen.fridge)),
            DeviceId::Stove => DeviceUpdate::Kitchen(KitchenDevice::Stove(self.kitchen.stove)),
            DeviceId::RoomLights => DeviceUpdate::Room(BedroomDevice::Lights(self.room.lights)),
            DeviceId::Fan => DeviceUpdate::Room(BedroomDevice::Fan(self.room.fan)),
            DeviceId::Curtains => DeviceUpdate::Room(BedroomDevice::Curtains(self.room.curtains)),
        }
    }

    /// Whether a switchable device is on (or open). `None` for the fridge.
    pub fn is_active(&self, id: DeviceId) -> Option<bool> {
        match id {
            DeviceId::LivingRoomLights => Some(self.living_room.lights.is_on()),
            DeviceId::Tv => Some(self.living_room.tv.state.is_on()),
            DeviceId::AirConditioning => Some(self.living_room.air_conditioning.state.is_on()),
            DeviceId::KitchenLights => Some(self.kitchen.lights.is_on()),
            DeviceId::Fridge => None,
            DeviceId::Stove => Some(self.kitchen.stove.state.is_on()),
            DeviceId::RoomLights => Some(self.room.lights.is_on()),
            DeviceId::Fan => Some(self.room.fan.state.is_on()),
            DeviceId::Curtains => Some(self.room.curtains.is_open()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};
    use serde_json::json;

    fn sample() -> DeviceStates {
        serde_json::from_value(json!({
            "livingRoom": {
                "lights": "off",
                "tv": {"state": "on", "channel": 5},
                "airConditioning": {"state": "off", "temperature": 22}
            },
            "kitchen": {
                "lights": "on",
                "fridge": {"temperature": 4, "alert": false},
                "stove": {"state": "off", "power": 3}
            },
            "room": {
                "lights": "off",
                "fan": {"state": "on", "speed": 2},
                "curtains": "closed"
            }
        }))
        .unwrap()
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let states = sample();
        assert_eq!(states.living_room.tv.channel, 5);
        assert_eq!(states.room.curtains, CurtainPosition::Closed);

        let value = serde_json::to_value(states).unwrap();
        assert!(value["livingRoom"]["airConditioning"].is_object());
    }

    #[test]
    fn apply_replaces_only_the_target_device() {
        let before = sample();
        let after = before.apply(DeviceUpdate::Kitchen(KitchenDevice::Lights(Power::Off)));

        assert_eq!(after.kitchen.lights, Power::Off);
        assert_eq!(after.kitchen.fridge, before.kitchen.fridge);
        assert_eq!(after.kitchen.stove, before.kitchen.stove);
        assert_eq!(after.living_room, before.living_room);
        assert_eq!(after.room, before.room);
    }

    #[test]
    fn apply_replaces_whole_sub_state() {
        let after = sample().apply(DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(Television {
            state: Power::Off,
            channel: 9,
        })));
        assert_eq!(
            after.living_room.tv,
            Television {
                state: Power::Off,
                channel: 9
            }
        );
    }

    /// A sub-state for `id` that differs from the one in `sample()`.
    fn different(id: DeviceId) -> DeviceUpdate {
        match id {
            DeviceId::LivingRoomLights => DeviceUpdate::LivingRoom(LivingRoomDevice::Lights(Power::On)),
            DeviceId::Tv => DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(Television {
                state: Power::Off,
                channel: 12,
            })),
            DeviceId::AirConditioning => {
                DeviceUpdate::LivingRoom(LivingRoomDevice::AirConditioning(AirConditioning {
                    state: Power::On,
                    temperature: 19,
                }))
            }
            DeviceId::KitchenLights => DeviceUpdate::Kitchen(KitchenDevice::Lights(Power::Off)),
            DeviceId::Fridge => DeviceUpdate::Kitchen(KitchenDevice::Fridge(Fridge {
                temperature: 9,
                alert: true,
            })),
            DeviceId::Stove => DeviceUpdate::Kitchen(KitchenDevice::Stove(Stove {
                state: Power::On,
                power: 7,
            })),
            DeviceId::RoomLights => DeviceUpdate::Room(BedroomDevice::Lights(Power::On)),
            DeviceId::Fan => DeviceUpdate::Room(BedroomDevice::Fan(Fan {
                state: Power::Off,
                speed: 4,
            })),
            DeviceId::Curtains => DeviceUpdate::Room(BedroomDevice::Curtains(CurtainPosition::Open)),
        }
    }

    #[test]
    fn apply_leaves_every_other_device_identical() {
        let before = sample();
        for id in DeviceId::ALL {
            let update = different(id);
            assert_ne!(before.current(id), update, "{id} update must change something");

            let after = before.apply(update);
            assert_eq!(after.current(id), update, "{id}");
            for other in DeviceId::ALL.into_iter().filter(|&other| other != id) {
                assert_eq!(
                    after.current(other),
                    before.current(other),
                    "applying {id} touched {other}"
                );
            }
        }
    }

    #[test]
    fn current_matches_device_id() {
        let states = sample();
        for id in DeviceId::ALL {
            assert_eq!(states.current(id).device_id(), id);
        }
    }

    #[test]
    fn is_active_reads_switch_state() {
        let states = sample();
        assert_eq!(states.is_active(DeviceId::Tv), Some(true));
        assert_eq!(states.is_active(DeviceId::LivingRoomLights), Some(false));
        assert_eq!(states.is_active(DeviceId::Curtains), Some(false));
        assert_eq!(states.is_active(DeviceId::Fridge), None);
    }

    #[test]
    fn missing_room_is_rejected() {
        let result = serde_json::from_value::<DeviceStates>(json!({"kitchen": {}}));
        assert!(result.is_err());
    }
}
