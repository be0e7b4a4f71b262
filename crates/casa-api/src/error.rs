use thiserror::Error;

/// Top-level error type for the `casa-api` crate.
///
/// Covers URL handling, the WebSocket transport, the Engine.IO / Socket.IO
/// handshakes, and payload decoding. `casa-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Endpoint ────────────────────────────────────────────────────
    /// Endpoint scheme cannot be mapped to a WebSocket scheme.
    #[error("Unsupported endpoint scheme '{0}' (expected http, https, ws or wss)")]
    UnsupportedScheme(String),

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection failed or a frame could not be read/written.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket closed before the session was established.
    #[error("WebSocket closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },

    // ── Engine.IO / Socket.IO ───────────────────────────────────────
    /// The Engine.IO open packet or Socket.IO connect packet never arrived.
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// The server answered the namespace connect with a `CONNECT_ERROR`.
    #[error("Server refused the connection: {0}")]
    ConnectRefused(String),

    /// No ping arrived within `pingInterval + pingTimeout`.
    #[error("No heartbeat from server for {timeout_ms}ms")]
    HeartbeatTimeout { timeout_ms: u64 },

    /// A frame did not follow the Engine.IO / Socket.IO packet grammar.
    #[error("Protocol error: {0}")]
    Protocol(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local ───────────────────────────────────────────────────────
    /// The background socket task has stopped; nothing can be emitted.
    #[error("Socket task is not running")]
    ChannelClosed,
}

impl Error {
    pub(crate) fn deserialization(err: &serde_json::Error, body: &str) -> Self {
        Self::Deserialization {
            message: err.to_string(),
            body: body.to_owned(),
        }
    }
}
