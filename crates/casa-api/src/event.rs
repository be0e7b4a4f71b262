//! Named events exchanged with the remote-control server.
//!
//! Payloads stay as raw JSON at this layer; `casa-core` converts them into
//! the typed device model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::protocol::SocketPacket;

pub const GET_INITIAL_STATE: &str = "getInitialState";
pub const UPDATE_DEVICE: &str = "updateDevice";
pub const INITIAL_STATE: &str = "initialState";
pub const STATE_CHANGED: &str = "stateChanged";

/// A device sub-state addressed by room and device name.
///
/// Used in both directions: as the `updateDevice` request and as the
/// `stateChanged` push. `state` always holds the device's complete
/// sub-state, never a partial patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceChange {
    pub room: String,
    pub device: String,
    pub state: Value,
}

/// Events the client emits.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Ask for the full snapshot. Sent after every (re)connect.
    GetInitialState,
    /// Propose a new device sub-state. The server decides.
    UpdateDevice(DeviceChange),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetInitialState => GET_INITIAL_STATE,
            Self::UpdateDevice(_) => UPDATE_DEVICE,
        }
    }

    pub fn into_packet(self) -> Result<SocketPacket, Error> {
        let name = self.name().to_owned();
        let data = match self {
            Self::GetInitialState => None,
            Self::UpdateDevice(change) => Some(
                serde_json::to_value(&change)
                    .map_err(|e| Error::deserialization(&e, &format!("{change:?}")))?,
            ),
        };
        Ok(SocketPacket::Event { name, data })
    }
}

/// Events the server pushes.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// The complete device snapshot.
    InitialState(Value),
    /// One device's new sub-state.
    StateChanged(DeviceChange),
    /// Any event this client does not subscribe to.
    Other { name: String, data: Option<Value> },
}

impl ServerEvent {
    /// Classify a decoded Socket.IO event.
    pub fn from_event(name: String, data: Option<Value>) -> Result<Self, Error> {
        match name.as_str() {
            INITIAL_STATE => Ok(Self::InitialState(data.unwrap_or(Value::Null))),
            STATE_CHANGED => {
                let raw = data.unwrap_or(Value::Null);
                serde_json::from_value(raw.clone())
                    .map(Self::StateChanged)
                    .map_err(|e| Error::deserialization(&e, &raw.to_string()))
            }
            _ => Ok(Self::Other { name, data }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::InitialState(_) => INITIAL_STATE,
            Self::StateChanged(_) => STATE_CHANGED,
            Self::Other { name, .. } => name,
        }
    }
}
