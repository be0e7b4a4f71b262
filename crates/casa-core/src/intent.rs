// ── User intents ──
//
// Builders that turn "switch X on" or "one more channel" into the full
// device sub-state to propose to the remote. They read the current
// snapshot and never write to it: the change shows up only once the
// remote confirms it with a push.

use crate::model::{
    BedroomDevice, DeviceId, DeviceStates, DeviceUpdate, KitchenDevice, LivingRoomDevice, Power,
};

/// Build the update that switches `device` on (or open) or off (or closed).
///
/// Siblings such as the TV channel are carried over unchanged. Returns
/// `None` for the fridge, which has no switch.
pub fn switch(states: &DeviceStates, device: DeviceId, on: bool) -> Option<DeviceUpdate> {
    let power = Power::from(on);
    let update = match device {
        DeviceId::LivingRoomLights => DeviceUpdate::LivingRoom(LivingRoomDevice::Lights(power)),
        DeviceId::Tv => {
            let mut tv = states.living_room.tv;
            tv.state = power;
            DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(tv))
        }
        DeviceId::AirConditioning => {
            let mut ac = states.living_room.air_conditioning;
            ac.state = power;
            DeviceUpdate::LivingRoom(LivingRoomDevice::AirConditioning(ac))
        }
        DeviceId::KitchenLights => DeviceUpdate::Kitchen(KitchenDevice::Lights(power)),
        DeviceId::Fridge => return None,
        DeviceId::Stove => {
            let mut stove = states.kitchen.stove;
            stove.state = power;
            DeviceUpdate::Kitchen(KitchenDevice::Stove(stove))
        }
        DeviceId::RoomLights => DeviceUpdate::Room(BedroomDevice::Lights(power)),
        DeviceId::Fan => {
            let mut fan = states.room.fan;
            fan.state = power;
            DeviceUpdate::Room(BedroomDevice::Fan(fan))
        }
        DeviceId::Curtains => DeviceUpdate::Room(BedroomDevice::Curtains(on.into())),
    };
    Some(update)
}

/// Build the update that flips a switchable device.
pub fn toggle(states: &DeviceStates, device: DeviceId) -> Option<DeviceUpdate> {
    let active = states.is_active(device)?;
    switch(states, device, !active)
}

// ── Numeric settings ────────────────────────────────────────────────

/// A numeric setting with a +/- adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    TvChannel,
    AcTemperature,
    StovePower,
    FanSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Increment,
    Decrement,
}

impl Step {
    fn apply(self, value: i64) -> i64 {
        match self {
            Self::Increment => value.saturating_add(1),
            Self::Decrement => value.saturating_sub(1),
        }
    }
}

impl Setting {
    pub const ALL: [Setting; 4] = [
        Self::TvChannel,
        Self::AcTemperature,
        Self::StovePower,
        Self::FanSpeed,
    ];

    /// The device this setting belongs to.
    pub fn device(self) -> DeviceId {
        match self {
            Self::TvChannel => DeviceId::Tv,
            Self::AcTemperature => DeviceId::AirConditioning,
            Self::StovePower => DeviceId::Stove,
            Self::FanSpeed => DeviceId::Fan,
        }
    }

    pub fn for_device(device: DeviceId) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.device() == device)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TvChannel => "Channel",
            Self::AcTemperature => "Temperature",
            Self::StovePower => "Power",
            Self::FanSpeed => "Speed",
        }
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::AcTemperature => Some("°C"),
            _ => None,
        }
    }

    pub fn value(self, states: &DeviceStates) -> i64 {
        match self {
            Self::TvChannel => states.living_room.tv.channel,
            Self::AcTemperature => states.living_room.air_conditioning.temperature,
            Self::StovePower => states.kitchen.stove.power,
            Self::FanSpeed => states.room.fan.speed,
        }
    }

    /// Adjusters are only offered while their device is on.
    pub fn is_visible(self, states: &DeviceStates) -> bool {
        states.is_active(self.device()).unwrap_or(false)
    }
}

/// Build the update that moves `setting` one step, keeping every sibling
/// field of the device. No bounds are enforced; the remote decides.
pub fn adjust(states: &DeviceStates, setting: Setting, step: Step) -> DeviceUpdate {
    match setting {
        Setting::TvChannel => {
            let mut tv = states.living_room.tv;
            tv.channel = step.apply(tv.channel);
            DeviceUpdate::LivingRoom(LivingRoomDevice::Tv(tv))
        }
        Setting::AcTemperature => {
            let mut ac = states.living_room.air_conditioning;
            ac.temperature = step.apply(ac.temperature);
            DeviceUpdate::LivingRoom(LivingRoomDevice::AirConditioning(ac))
        }
        Setting::StovePower => {
            let mut stove = states.kitchen.stove;
            stove.power = step.apply(stove.power);
            DeviceUpdate::Kitchen(KitchenDevice::Stove(stove))
        }
        Setting::FanSpeed => {
            let mut fan = states.room.fan;
            fan.speed = step.apply(fan.speed);
            DeviceUpdate::Room(BedroomDevice::Fan(fan))
        }
    }
}
