// ── Core error types ──
//
// User-facing errors from casa-core. Consumers never see raw WebSocket
// or JSON failures; the `From<casa_api::Error>` impl folds transport
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to remote at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Not connected to the remote")]
    NotConnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unknown device '{device}' in room '{room}'")]
    UnknownDevice { room: String, device: String },

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn payload(what: &str, err: &serde_json::Error) -> Self {
        CoreError::Protocol {
            message: format!("malformed {what} payload: {err}"),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<casa_api::Error> for CoreError {
    fn from(err: casa_api::Error) -> Self {
        match err {
            casa_api::Error::UnsupportedScheme(scheme) => CoreError::Config {
                message: format!("unsupported endpoint scheme '{scheme}' (use http, https, ws or wss)"),
            },
            casa_api::Error::WebSocketConnect(reason) | casa_api::Error::Handshake(reason) => {
                CoreError::ConnectionFailed {
                    url: String::new(),
                    reason,
                }
            }
            casa_api::Error::ConnectRefused(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("connection refused by remote: {reason}"),
            },
            casa_api::Error::WebSocketClosed { .. }
            | casa_api::Error::HeartbeatTimeout { .. }
            | casa_api::Error::ChannelClosed => CoreError::NotConnected,
            casa_api::Error::Protocol(message) => CoreError::Protocol { message },
            casa_api::Error::Deserialization { message, body } => CoreError::Protocol {
                message: format!("{message} (body: {body})"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_channel_means_not_connected() {
        let err = CoreError::from(casa_api::Error::ChannelClosed);
        assert!(matches!(err, CoreError::NotConnected));
    }

    #[test]
    fn bad_scheme_is_a_config_problem() {
        let err = CoreError::from(casa_api::Error::UnsupportedScheme("ftp".into()));
        assert!(matches!(err, CoreError::Config { .. }));
        assert!(err.to_string().contains("ftp"));
    }
}
