// ── Device sub-states ──
//
// Each struct is the complete state of one device exactly as it travels
// on the wire. Updates always replace a whole sub-state; fields are never
// merged client-side.

use serde::{Deserialize, Serialize};

/// On/off switch state, `"on"` / `"off"` on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    #[default]
    Off,
}

impl Power {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for Power {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Curtain state, `"open"` / `"closed"` on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurtainPosition {
    Open,
    #[default]
    Closed,
}

impl CurtainPosition {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl From<bool> for CurtainPosition {
    fn from(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Television {
    pub state: Power,
    pub channel: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConditioning {
    pub state: Power,
    /// Target temperature in °C.
    pub temperature: i64,
}

/// Read-only on the client: there is no switch and no adjuster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fridge {
    /// Current inside temperature in °C.
    pub temperature: i64,
    /// Set by the remote when the fridge is too warm.
    pub alert: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stove {
    pub state: Power,
    pub power: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fan {
    pub state: Power,
    pub speed: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn power_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_value(Power::On).unwrap(), json!("on"));
        assert_eq!(serde_json::from_value::<Power>(json!("off")).unwrap(), Power::Off);
        assert!(serde_json::from_value::<Power>(json!("ON")).is_err());
    }

    #[test]
    fn curtains_use_open_closed() {
        assert_eq!(serde_json::to_value(CurtainPosition::Closed).unwrap(), json!("closed"));
        assert!(CurtainPosition::from(true).is_open());
    }

    #[test]
    fn television_shape() {
        let tv: Television = serde_json::from_value(json!({"state": "on", "channel": 5})).unwrap();
        assert_eq!(
            tv,
            Television {
                state: Power::On,
                channel: 5
            }
        );
        assert_eq!(serde_json::to_value(tv).unwrap(), json!({"state": "on", "channel": 5}));
    }

    #[test]
    fn fridge_requires_both_fields() {
        assert!(serde_json::from_value::<Fridge>(json!({"temperature": 4})).is_err());
    }
}
