//! Engine.IO v4 and Socket.IO v4 packet codec (WebSocket transport only).
//!
//! Every WebSocket text frame carries exactly one Engine.IO packet: a single
//! type digit followed by an optional payload. Socket.IO packets ride inside
//! Engine.IO `message` packets, so an event emitted by the server arrives as
//!
//! ```text
//! 42["stateChanged",{"room":"kitchen","device":"lights","state":"on"}]
//! ││└─ JSON array: event name + arguments
//! │└── Socket.IO packet type (2 = EVENT)
//! └─── Engine.IO packet type (4 = MESSAGE)
//! ```
//!
//! Binary attachments are not supported; the remote never sends any.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

// ── Engine.IO ────────────────────────────────────────────────────────

/// Handshake payload of the Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// How long the client may go without hearing a ping before it treats
    /// the connection as dead.
    pub fn heartbeat_deadline(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

/// A single Engine.IO packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self, Error> {
        let mut chars = frame.chars();
        let kind = chars
            .next()
            .ok_or_else(|| Error::Protocol("empty Engine.IO frame".into()))?;
        let body = chars.as_str();

        match kind {
            '0' => serde_json::from_str(body)
                .map(Self::Open)
                .map_err(|e| Error::deserialization(&e, body)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(body.to_owned())),
            '3' => Ok(Self::Pong(body.to_owned())),
            '4' => Ok(Self::Message(body.to_owned())),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(Error::Protocol(format!(
                "unknown Engine.IO packet type '{other}'"
            ))),
        }
    }

    /// Encode for the wire. The client never sends `open`; encoding one
    /// yields the bare type digit.
    pub fn encode(&self) -> String {
        match self {
            Self::Open(_) => "0".to_owned(),
            Self::Close => "1".to_owned(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(data) => format!("4{data}"),
            Self::Upgrade => "5".to_owned(),
            Self::Noop => "6".to_owned(),
        }
    }
}

// ── Socket.IO ────────────────────────────────────────────────────────

/// A single Socket.IO packet addressed to the root namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    /// Namespace connect. The client sends it bare; the server answers with
    /// `{"sid": ...}`.
    Connect(Option<Value>),
    Disconnect,
    Event { name: String, data: Option<Value> },
    Ack,
    ConnectError(Value),
    /// `BINARY_EVENT` / `BINARY_ACK`; decoded only so they can be skipped.
    Binary,
}

impl SocketPacket {
    /// Decode the payload of an Engine.IO `message` packet.
    ///
    /// Grammar: `<type>[<attachments>-][<namespace>,][<ack id>][<json>]`.
    /// Namespace and ack id are accepted and discarded.
    pub fn decode(payload: &str) -> Result<Self, Error> {
        let mut chars = payload.chars();
        let kind = chars
            .next()
            .ok_or_else(|| Error::Protocol("empty Socket.IO packet".into()))?;
        if matches!(kind, '5' | '6') {
            return Ok(Self::Binary);
        }

        let mut rest = chars.as_str();
        if rest.starts_with('/') {
            rest = rest.split_once(',').map_or("", |(_, tail)| tail);
        }
        let ack_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let json = rest.get(ack_len..).unwrap_or_default();

        match kind {
            '0' if json.is_empty() => Ok(Self::Connect(None)),
            '0' => parse_json(json).map(|v| Self::Connect(Some(v))),
            '1' => Ok(Self::Disconnect),
            '2' => decode_event(json),
            '3' => Ok(Self::Ack),
            '4' if json.is_empty() => Ok(Self::ConnectError(Value::Null)),
            '4' => parse_json(json).map(Self::ConnectError),
            other => Err(Error::Protocol(format!(
                "unknown Socket.IO packet type '{other}'"
            ))),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Connect(None) => "0".to_owned(),
            Self::Connect(Some(auth)) => format!("0{auth}"),
            Self::Disconnect => "1".to_owned(),
            Self::Event { name, data } => {
                let mut args = vec![Value::String(name.clone())];
                args.extend(data.iter().cloned());
                format!("2{}", Value::Array(args))
            }
            Self::Ack => "3".to_owned(),
            Self::ConnectError(data) => format!("4{data}"),
            Self::Binary => "5".to_owned(),
        }
    }

    /// Wrap in an Engine.IO `message` packet, ready for a text frame.
    pub fn into_frame(self) -> String {
        EnginePacket::Message(self.encode()).encode()
    }
}

fn parse_json(json: &str) -> Result<Value, Error> {
    serde_json::from_str(json).map_err(|e| Error::deserialization(&e, json))
}

fn decode_event(json: &str) -> Result<SocketPacket, Error> {
    let Value::Array(args) = parse_json(json)? else {
        return Err(Error::Protocol(format!(
            "event payload is not an array: {json}"
        )));
    };
    let mut args = args.into_iter();
    let name = match args.next() {
        Some(Value::String(name)) => name,
        _ => {
            return Err(Error::Protocol(format!(
                "event payload has no name: {json}"
            )));
        }
    };
    Ok(SocketPacket::Event {
        name,
        data: args.next(),
    })
}
