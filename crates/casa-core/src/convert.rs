// ── Wire ↔ domain conversion ──
//
// `casa-api` hands over raw JSON; these conversions turn it into the typed
// model and back. Anything that does not fit the model is an error here and
// is dropped (with a warning) by the session task.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use casa_api::DeviceChange;

use crate::error::CoreError;
use crate::model::{
    BedroomDevice, DeviceId, DeviceStates, DeviceUpdate, KitchenDevice, LivingRoomDevice,
};

/// Parse an `initialState` payload into a full snapshot.
pub fn snapshot_from_value(value: Value) -> Result<DeviceStates, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::payload("initialState", &e))
}

fn sub_state<T: DeserializeOwned>(id: DeviceId, state: Value) -> Result<T, CoreError> {
    serde_json::from_value(state).map_err(|e| CoreError::payload(&id.to_string(), &e))
}

fn to_state<T: Serialize>(id: DeviceId, state: &T) -> Result<Value, CoreError> {
    serde_json::to_value(state).map_err(|e| CoreError::payload(&id.to_string(), &e))
}

impl TryFrom<DeviceChange> for DeviceUpdate {
    type Error = CoreError;

    fn try_from(change: DeviceChange) -> Result<Self, Self::Error> {
        let Some(id) = DeviceId::from_wire(&change.room, &change.device) else {
            return Err(CoreError::UnknownDevice {
                room: change.room,
                device: change.device,
            });
        };
        let state = change.state;

        Ok(match id {
            DeviceId::LivingRoomLights => {
                DeviceUpdate::LivingRoom(LivingRoomDevice::Lights(sub_state(id, state)?))
            }
            DeviceId::Tv => DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(sub_state(id, state)?)),
            DeviceId::AirConditioning => {
                DeviceUpdate::LivingRoom(LivingRoomDevice::AirConditioning(sub_state(id, state)?))
            }
            DeviceId::KitchenLights => {
                DeviceUpdate::Kitchen(KitchenDevice::Lights(sub_state(id, state)?))
            }
            DeviceId::Fridge => DeviceUpdate::Kitchen(KitchenDevice::Fridge(sub_state(id, state)?)),
            DeviceId::Stove => DeviceUpdate::Kitchen(KitchenDevice::Stove(sub_state(id, state)?)),
            DeviceId::RoomLights => DeviceUpdate::Room(BedroomDevice::Lights(sub_state(id, state)?)),
            DeviceId::Fan => DeviceUpdate::Room(BedroomDevice::Fan(sub_state(id, state)?)),
            DeviceId::Curtains => {
                DeviceUpdate::Room(BedroomDevice::Curtains(sub_state(id, state)?))
            }
        })
    }
}

impl TryFrom<&DeviceUpdate> for DeviceChange {
    type Error = CoreError;

    fn try_from(update: &DeviceUpdate) -> Result<Self, Self::Error> {
        let id = update.device_id();
        let state = match update {
            DeviceUpdate::LivingRoom(LivingRoomDevice::Lights(s))
            | DeviceUpdate::Kitchen(KitchenDevice::Lights(s))
            | DeviceUpdate::Room(BedroomDevice::Lights(s)) => to_state(id, s)?,
            DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(s)) => to_state(id, s)?,
            DeviceUpdate::LivingRoom(LivingRoomDevice::AirConditioning(s)) => to_state(id, s)?,
            DeviceUpdate::Kitchen(KitchenDevice::Fridge(s)) => to_state(id, s)?,
            DeviceUpdate::Kitchen(KitchenDevice::Stove(s)) => to_state(id, s)?,
            DeviceUpdate::Room(BedroomDevice::Fan(s)) => to_state(id, s)?,
            DeviceUpdate::Room(BedroomDevice::Curtains(s)) => to_state(id, s)?,
        };
        Ok(DeviceChange {
            room: id.room().wire_name().to_owned(),
            device: id.wire_name().to_owned(),
            state,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{CurtainPosition, Power, Television};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn change(room: &str, device: &str, state: Value) -> DeviceChange {
        DeviceChange {
            room: room.into(),
            device: device.into(),
            state,
        }
    }

    #[test]
    fn lights_push_becomes_typed_update() {
        let update = DeviceUpdate::try_from(change("livingRoom", "lights", json!("on"))).unwrap();
        assert_eq!(
            update,
            DeviceUpdate::LivingRoom(LivingRoomDevice::Lights(Power::On))
        );
    }

    #[test]
    fn curtains_push_becomes_typed_update() {
        let update = DeviceUpdate::try_from(change("room", "curtains", json!("open"))).unwrap();
        assert_eq!(
            update,
            DeviceUpdate::Room(BedroomDevice::Curtains(CurtainPosition::Open))
        );
    }

    #[test]
    fn tv_update_serializes_full_sub_state() {
        let update = DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(Television {
            state: Power::On,
            channel: 6,
        }));
        let wire = DeviceChange::try_from(&update).unwrap();
        assert_eq!(
            wire,
            change("livingRoom", "tv", json!({"state": "on", "channel": 6}))
        );
    }

    #[test]
    fn unknown_device_is_rejected() {
        let err = DeviceUpdate::try_from(change("garage", "door", json!("open"))).unwrap_err();
        assert!(matches!(err, CoreError::UnknownDevice { .. }));
    }

    #[test]
    fn shape_mismatch_is_a_protocol_error() {
        let err = DeviceUpdate::try_from(change("kitchen", "stove", json!("on"))).unwrap_err();
        let CoreError::Protocol { message } = err else {
            panic!("expected protocol error, got {err:?}");
        };
        assert!(message.contains("kitchen.stove"), "{message}");
    }

    #[test]
    fn snapshot_rejects_non_objects() {
        assert!(snapshot_from_value(json!(null)).is_err());
    }
}
