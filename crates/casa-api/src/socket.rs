//! Socket.IO connection with auto-reconnect.
//!
//! Connects to the remote-control server's Socket.IO endpoint over a
//! WebSocket, performs the Engine.IO and namespace handshakes, answers
//! heartbeats, and streams lifecycle changes and server events through an
//! unbounded [`mpsc`] channel in receipt order. Outbound events are queued
//! through an [`Emitter`] and written by the same background task.
//!
//! # Example
//!
//! ```rust,ignore
//! use casa_api::{ClientEvent, ReconnectConfig, SocketEvent, SocketHandle};
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let endpoint = Url::parse("http://localhost:3000")?;
//! let handle = SocketHandle::connect(&endpoint, ReconnectConfig::default(), cancel.clone())?;
//! let (mut events, emitter) = handle.into_parts();
//!
//! while let Some(event) = events.recv().await {
//!     if let SocketEvent::Connected { .. } = event {
//!         emitter.emit(ClientEvent::GetInitialState)?;
//!     }
//! }
//! ```

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::event::{ClientEvent, ServerEvent};
use crate::protocol::{EnginePacket, Handshake, SocketPacket};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Upper bound on the Engine.IO + namespace handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(20);

// ── SocketEvent ──────────────────────────────────────────────────────

/// Everything the background task reports, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    /// A connection attempt is starting. `attempt` is 0 for the very first
    /// try, then counts retries since the last established connection.
    Connecting { attempt: u32 },
    /// Namespace handshake completed.
    Connected { sid: String },
    /// An established connection was lost.
    Disconnected { reason: String },
    /// A server event.
    Message(ServerEvent),
}

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Exponential backoff configuration for reconnection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay (before jitter). Default: 30s.
    pub max_delay: Duration,

    /// Maximum consecutive failed attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

// ── Endpoint ─────────────────────────────────────────────────────────

/// Build the Engine.IO WebSocket URL from a server endpoint.
///
/// `http://localhost:3000` becomes
/// `ws://localhost:3000/socket.io/?EIO=4&transport=websocket`.
pub fn engine_url(endpoint: &Url) -> Result<Url, Error> {
    let scheme = match endpoint.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(Error::UnsupportedScheme(other.to_owned())),
    };

    let mut url = endpoint.clone();
    url.set_scheme(scheme)
        .map_err(|()| Error::UnsupportedScheme(endpoint.scheme().to_owned()))?;
    let base = endpoint.path().trim_end_matches('/');
    url.set_path(&format!("{base}/socket.io/"));
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("EIO", "4")
        .append_pair("transport", "websocket");
    Ok(url)
}

// ── Emitter ──────────────────────────────────────────────────────────

/// Cloneable sender for outbound events. Fire-and-forget: a successful
/// `emit` only means the event was queued.
#[derive(Debug, Clone)]
pub struct Emitter {
    tx: mpsc::UnboundedSender<ClientEvent>,
}

impl Emitter {
    pub fn new(tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, event: ClientEvent) -> Result<(), Error> {
        self.tx.send(event).map_err(|_| Error::ChannelClosed)
    }
}

// ── SocketHandle ─────────────────────────────────────────────────────

/// Handle to a running Socket.IO connection.
///
/// Cancel the token passed to [`connect`](Self::connect) (or call
/// [`shutdown`](Self::shutdown)) to tear down the background task.
pub struct SocketHandle {
    events: mpsc::UnboundedReceiver<SocketEvent>,
    emitter: Emitter,
    cancel: CancellationToken,
}

impl SocketHandle {
    /// Spawn the connection loop. Returns immediately; the first attempt
    /// happens asynchronously and is reported as
    /// [`SocketEvent::Connecting`].
    pub fn connect(
        endpoint: &Url,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
    ) -> Result<Self, Error> {
        let url = engine_url(endpoint)?;
        let (event_tx, events) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            socket_loop(url, event_tx, outbound_rx, reconnect, task_cancel).await;
        });

        Ok(Self {
            events,
            emitter: Emitter::new(outbound_tx),
            cancel,
        })
    }

    /// Next event, or `None` once the background task has stopped.
    pub async fn next_event(&mut self) -> Option<SocketEvent> {
        self.events.recv().await
    }

    pub fn emitter(&self) -> Emitter {
        self.emitter.clone()
    }

    /// Split into the event receiver and the emitter so they can live in
    /// different tasks.
    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<SocketEvent>, Emitter) {
        (self.events, self.emitter)
    }

    /// Signal the background task to shut down.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// connect → run → on drop, back off → reconnect.
async fn socket_loop(
    url: Url,
    event_tx: mpsc::UnboundedSender<SocketEvent>,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientEvent>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        if event_tx.send(SocketEvent::Connecting { attempt }).is_err() {
            break;
        }

        let mut established = false;
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = run_connection(&url, &event_tx, &mut outbound_rx, &cancel, &mut established) => result,
        };

        if cancel.is_cancelled() {
            break;
        }

        let reason = match &result {
            Ok(()) => "server closed the connection".to_owned(),
            Err(e) => e.to_string(),
        };

        if established {
            tracing::info!(%reason, "Socket disconnected, reconnecting");
            let _ = event_tx.send(SocketEvent::Disconnected { reason });
            attempt = 0;
        } else {
            tracing::warn!(%reason, attempt, "Socket connection attempt failed");
            if let Some(max) = reconnect.max_retries {
                if attempt >= max {
                    tracing::error!(max_retries = max, "Reconnection limit reached, giving up");
                    break;
                }
            }
        }

        let delay = backoff_delay(attempt, &reconnect);
        tracing::debug!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            attempt,
            "Waiting before reconnect"
        );
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
        attempt = attempt.saturating_add(1);
    }

    tracing::debug!("Socket loop exiting");
}

// ── Single connection lifecycle ──────────────────────────────────────

/// What the reader should do after routing one text frame.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Pong(String),
    Closed,
}

/// Establish one connection and pump frames until it drops.
///
/// Sets `established` once the namespace handshake completes, so the
/// caller knows whether a `Disconnected` event is owed.
async fn run_connection(
    url: &Url,
    event_tx: &mpsc::UnboundedSender<SocketEvent>,
    outbound_rx: &mut mpsc::UnboundedReceiver<ClientEvent>,
    cancel: &CancellationToken,
    established: &mut bool,
) -> Result<(), Error> {
    tracing::info!(url = %url, "Connecting to Socket.IO endpoint");

    let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))?;
    let (mut write, mut read) = ws_stream.split();

    let (sid, handshake) = tokio::time::timeout(HANDSHAKE_TIMEOUT, handshake(&mut write, &mut read))
        .await
        .map_err(|_| Error::Handshake("timed out waiting for the server handshake".into()))??;
    let heartbeat = handshake.heartbeat_deadline();

    // Requests queued while we were offline describe a UI the user no
    // longer sees.
    let mut stale = 0usize;
    while outbound_rx.try_recv().is_ok() {
        stale += 1;
    }
    if stale > 0 {
        tracing::debug!(stale, "Discarded events queued while disconnected");
    }

    tracing::info!(%sid, ping_interval = handshake.ping_interval, "Socket.IO connected");
    *established = true;
    let _ = event_tx.send(SocketEvent::Connected { sid });

    let mut deadline = Instant::now() + heartbeat;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                return Ok(());
            }
            () = tokio::time::sleep_until(deadline) => {
                return Err(Error::HeartbeatTimeout {
                    timeout_ms: u64::try_from(heartbeat.as_millis()).unwrap_or(u64::MAX),
                });
            }
            Some(event) = outbound_rx.recv() => {
                let name = event.name();
                let frame = event.into_packet()?.into_frame();
                tracing::debug!(event = name, "Emitting");
                send_text(&mut write, frame).await?;
            }
            frame = read.next() => {
                deadline = Instant::now() + heartbeat;
                match frame {
                    Some(Ok(Message::Text(text))) => match route_text(&text, event_tx)? {
                        Flow::Continue => {}
                        Flow::Pong(data) => {
                            send_text(&mut write, EnginePacket::Pong(data).encode()).await?;
                        }
                        Flow::Closed => return Ok(()),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(code = %cf.code, reason = %cf.reason, "Close frame received");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => return Err(Error::WebSocketConnect(e.to_string())),
                    None => {
                        tracing::info!("WebSocket stream ended");
                        return Ok(());
                    }
                    // Binary, Ping, Pong, Frame -- tungstenite answers pings itself
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Engine.IO open, then the root namespace connect. Returns the socket id
/// and the heartbeat parameters.
async fn handshake(
    write: &mut WsSink,
    read: &mut WsSource,
) -> Result<(String, Handshake), Error> {
    let handshake = match read_packet(read).await? {
        EnginePacket::Open(handshake) => handshake,
        other => {
            return Err(Error::Handshake(format!(
                "expected open packet, got {other:?}"
            )));
        }
    };

    send_text(write, SocketPacket::Connect(None).into_frame()).await?;

    loop {
        match read_packet(read).await? {
            EnginePacket::Message(payload) => match SocketPacket::decode(&payload)? {
                SocketPacket::Connect(ack) => {
                    let sid = ack
                        .as_ref()
                        .and_then(|v| v.get("sid"))
                        .and_then(|v| v.as_str())
                        .unwrap_or(&handshake.sid)
                        .to_owned();
                    return Ok((sid, handshake));
                }
                SocketPacket::ConnectError(data) => {
                    return Err(Error::ConnectRefused(data.to_string()));
                }
                other => tracing::debug!(?other, "Ignoring packet before namespace connect"),
            },
            EnginePacket::Ping(data) => send_text(write, EnginePacket::Pong(data).encode()).await?,
            EnginePacket::Close => {
                return Err(Error::Handshake("server closed during handshake".into()));
            }
            _ => {}
        }
    }
}

async fn send_text(write: &mut WsSink, frame: String) -> Result<(), Error> {
    write
        .send(Message::text(frame))
        .await
        .map_err(|e| Error::WebSocketConnect(e.to_string()))
}

/// Read frames until one decodes to an Engine.IO packet.
async fn read_packet(read: &mut WsSource) -> Result<EnginePacket, Error> {
    loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => return EnginePacket::decode(&text),
            Some(Ok(Message::Close(frame))) => {
                let (code, reason) = frame.map_or((1005, String::new()), |cf| {
                    (u16::from(cf.code), cf.reason.to_string())
                });
                return Err(Error::WebSocketClosed { code, reason });
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(Error::WebSocketConnect(e.to_string())),
            None => {
                return Err(Error::WebSocketClosed {
                    code: 1006,
                    reason: "stream ended".into(),
                });
            }
        }
    }
}

// ── Frame routing ────────────────────────────────────────────────────

/// Route one text frame from an established connection.
///
/// Undecodable Socket.IO packets and malformed event payloads are logged
/// and skipped; only Engine.IO violations end the connection.
fn route_text(text: &str, event_tx: &mpsc::UnboundedSender<SocketEvent>) -> Result<Flow, Error> {
    let payload = match EnginePacket::decode(text)? {
        EnginePacket::Ping(data) => return Ok(Flow::Pong(data)),
        EnginePacket::Close => return Ok(Flow::Closed),
        EnginePacket::Message(payload) => payload,
        EnginePacket::Open(_) | EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {
            return Ok(Flow::Continue);
        }
    };

    let packet = match SocketPacket::decode(&payload) {
        Ok(packet) => packet,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping undecodable Socket.IO packet");
            return Ok(Flow::Continue);
        }
    };

    match packet {
        SocketPacket::Event { name, data } => match ServerEvent::from_event(name, data) {
            Ok(event) => {
                tracing::trace!(event = event.name(), "Server event");
                let _ = event_tx.send(SocketEvent::Message(event));
            }
            Err(e) => tracing::warn!(error = %e, "Dropping malformed server event"),
        },
        SocketPacket::Disconnect => {
            tracing::info!("Server disconnected this socket");
            return Ok(Flow::Closed);
        }
        SocketPacket::ConnectError(data) => return Err(Error::ConnectRefused(data.to_string())),
        SocketPacket::Connect(_) | SocketPacket::Ack | SocketPacket::Binary => {}
    }
    Ok(Flow::Continue)
}

// ── Backoff calculation ──────────────────────────────────────────────

/// `min(initial * 2^attempt, max)` scaled by a deterministic ±25% jitter
/// derived from the attempt number.
fn backoff_delay(attempt: u32, config: &ReconnectConfig) -> Duration {
    let factor = 2_u32.saturating_pow(attempt.min(16));
    let capped = config.initial_delay.saturating_mul(factor).min(config.max_delay);
    let spread = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
    capped.mul_f64(spread)
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::event::DeviceChange;

    #[test]
    fn default_reconnect_config() {
        let config = ReconnectConfig::default();
        assert_eq!(config.initial_delay, Duration::from_secs(1));
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert!(config.max_retries.is_none());
    }

    #[test]
    fn backoff_grows_then_caps() {
        let config = ReconnectConfig::default();
        let d0 = backoff_delay(0, &config);
        let d2 = backoff_delay(2, &config);
        let d4 = backoff_delay(4, &config);
        assert!(d2 > d0, "d2 ({d2:?}) should exceed d0 ({d0:?})");
        assert!(d4 > d2, "d4 ({d4:?}) should exceed d2 ({d2:?})");

        let capped = ReconnectConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            max_retries: None,
        };
        // Jitter allows at most +25% over the cap.
        assert!(backoff_delay(40, &capped) <= Duration::from_millis(12_500));
    }

    #[test]
    fn engine_url_from_http_endpoint() {
        let endpoint = Url::parse("http://localhost:3000").unwrap();
        assert_eq!(
            engine_url(&endpoint).unwrap().as_str(),
            "ws://localhost:3000/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn engine_url_keeps_mount_path_and_tls() {
        let endpoint = Url::parse("https://home.example/remote/?token=x#top").unwrap();
        assert_eq!(
            engine_url(&endpoint).unwrap().as_str(),
            "wss://home.example/remote/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn engine_url_rejects_other_schemes() {
        let endpoint = Url::parse("ftp://localhost:3000").unwrap();
        assert!(matches!(
            engine_url(&endpoint),
            Err(Error::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn route_ping_requests_pong() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(route_text("2", &tx).unwrap(), Flow::Pong(String::new()));
    }

    #[test]
    fn route_state_changed_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let frame = r#"42["stateChanged",{"room":"livingRoom","device":"lights","state":"on"}]"#;

        assert_eq!(route_text(frame, &tx).unwrap(), Flow::Continue);
        assert_eq!(
            rx.try_recv().unwrap(),
            SocketEvent::Message(ServerEvent::StateChanged(DeviceChange {
                room: "livingRoom".into(),
                device: "lights".into(),
                state: json!("on"),
            }))
        );
    }

    #[test]
    fn route_preserves_receipt_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for state in ["on", "off", "on"] {
            let frame = format!(
                r#"42["stateChanged",{{"room":"kitchen","device":"lights","state":"{state}"}}]"#
            );
            route_text(&frame, &tx).unwrap();
        }

        let states: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|event| match event {
                SocketEvent::Message(ServerEvent::StateChanged(change)) => change.state,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(states, vec![json!("on"), json!("off"), json!("on")]);
    }

    #[test]
    fn route_skips_malformed_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let frame = r#"42["stateChanged",{"device":"lights"}]"#;

        assert_eq!(route_text(frame, &tx).unwrap(), Flow::Continue);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn route_server_disconnect_closes() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(route_text("41", &tx).unwrap(), Flow::Closed);
        assert_eq!(route_text("1", &tx).unwrap(), Flow::Closed);
    }

    #[test]
    fn route_unknown_engine_packet_is_fatal() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(matches!(route_text("x", &tx), Err(Error::Protocol(_))));
    }

    #[test]
    fn emitter_reports_stopped_task() {
        let (tx, rx) = mpsc::unbounded_channel();
        let emitter = Emitter::new(tx);
        drop(rx);
        assert!(matches!(
            emitter.emit(ClientEvent::GetInitialState),
            Err(Error::ChannelClosed)
        ));
    }
}
