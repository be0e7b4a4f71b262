// ── Remote abstraction ──
//
// Lifecycle management for the connection to the smart home remote.
// Owns the transport, runs the session task that is the single writer
// of the DeviceStore, and routes device update requests outbound.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use casa_api::{ClientEvent, DeviceChange, Emitter, ServerEvent, SocketEvent, SocketHandle};

use crate::config::RemoteConfig;
use crate::convert::snapshot_from_value;
use crate::error::CoreError;
use crate::model::DeviceUpdate;
use crate::store::DeviceStore;
use crate::stream::{Snapshot, SnapshotStream};

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

// ── Remote ───────────────────────────────────────────────────────

/// The client object the UI talks to.
///
/// Cheaply cloneable via `Arc<RemoteInner>`. Build it once at startup,
/// call [`connect()`](Self::connect), and [`disconnect()`](Self::disconnect)
/// on shutdown.
#[derive(Clone)]
pub struct Remote {
    inner: Arc<RemoteInner>,
}

struct RemoteInner {
    config: RemoteConfig,
    store: DeviceStore,
    connection_state: watch::Sender<ConnectionState>,
    /// Present while a session is running.
    emitter: ArcSwapOption<Emitter>,
    /// Parent token; each session runs under a child of it.
    cancel: CancellationToken,
    /// The running session. Locked for the whole of `connect()` and
    /// `disconnect()` so the two never interleave.
    session: Mutex<Option<Session>>,
}

/// A session task and the token that stops it.
struct Session {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Remote {
    /// Create a new Remote. Does NOT connect.
    pub fn new(config: RemoteConfig) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();

        Self {
            inner: Arc::new(RemoteInner {
                config,
                store: DeviceStore::new(),
                connection_state,
                emitter: ArcSwapOption::empty(),
                cancel,
                session: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Start the transport and the session task.
    ///
    /// Returns once both are spawned; the connection itself is reported
    /// through [`connection_state()`](Self::connection_state). Calling it
    /// while a session is running does nothing.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let mut session = self.inner.session.lock().await;
        if session.as_ref().is_some_and(|s| !s.task.is_finished()) {
            debug!("session already running");
            return Ok(());
        }

        let cancel = self.inner.cancel.child_token();
        let endpoint = &self.inner.config.endpoint;
        let handle = SocketHandle::connect(endpoint, self.inner.config.reconnect(), cancel.clone())
            .map_err(|e| match CoreError::from(e) {
                CoreError::ConnectionFailed { reason, .. } => CoreError::ConnectionFailed {
                    url: endpoint.to_string(),
                    reason,
                },
                other => other,
            })?;
        let (events, emitter) = handle.into_parts();

        info!(endpoint = %endpoint, "starting remote session");
        let task = self.spawn_session(events, emitter, cancel.clone());
        *session = Some(Session { cancel, task });
        Ok(())
    }

    fn spawn_session(
        &self,
        events: mpsc::UnboundedReceiver<SocketEvent>,
        emitter: Emitter,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        self.inner.connection_state.send_replace(ConnectionState::Connecting);
        self.inner.emitter.store(Some(Arc::new(emitter.clone())));
        tokio::spawn(session_task(Arc::clone(&self.inner), events, emitter, cancel))
    }

    /// End the session: stop the transport, join the session task, drop
    /// the snapshot. `connect()` may be called again afterwards.
    pub async fn disconnect(&self) {
        let mut session = self.inner.session.lock().await;
        if let Some(Session { cancel, task }) = session.take() {
            cancel.cancel();
            if let Err(e) = task.await {
                warn!(error = %e, "session task ended abnormally");
            }
        }

        self.inner.end_session();
        drop(session);
        debug!("disconnected");
    }

    // ── Requests ─────────────────────────────────────────────────

    /// Ask the remote to change one device.
    ///
    /// Fire-and-forget: the local snapshot is not touched. The change
    /// becomes visible only when the remote pushes `stateChanged`.
    pub fn request_device_update(&self, update: DeviceUpdate) -> Result<(), CoreError> {
        if !self.inner.connection_state.borrow().is_connected() {
            return Err(CoreError::NotConnected);
        }
        let Some(emitter) = self.inner.emitter.load_full() else {
            return Err(CoreError::NotConnected);
        };

        let change = DeviceChange::try_from(&update)?;
        debug!(room = %change.room, device = %change.device, "requesting device update");
        emitter.emit(ClientEvent::UpdateDevice(change))?;
        Ok(())
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn snapshot(&self) -> SnapshotStream {
        self.inner.store.subscribe()
    }

    pub fn current_snapshot(&self) -> Snapshot {
        self.inner.store.snapshot()
    }
}

// ── Session task ─────────────────────────────────────────────────

impl RemoteInner {
    fn set_state(&self, state: ConnectionState) {
        self.connection_state.send_if_modified(|current| {
            let changed = *current != state;
            *current = state;
            changed
        });
    }

    /// State goes first: an observer that sees the snapshot vanish must
    /// already see the connection as down.
    fn end_session(&self) {
        self.emitter.store(None);
        self.set_state(ConnectionState::Disconnected);
        self.store.clear();
    }

    fn handle_socket_event(&self, event: SocketEvent, emitter: &Emitter) {
        match event {
            SocketEvent::Connecting { attempt: 0 } => self.set_state(ConnectionState::Connecting),
            SocketEvent::Connecting { attempt } => {
                self.set_state(ConnectionState::Reconnecting { attempt });
            }
            SocketEvent::Connected { sid } => {
                info!(%sid, "connected to remote");
                self.set_state(ConnectionState::Connected);
                if let Err(e) = emitter.emit(ClientEvent::GetInitialState) {
                    warn!(error = %e, "could not request initial state");
                }
            }
            SocketEvent::Disconnected { reason } => {
                warn!(%reason, "lost connection to remote");
                self.set_state(ConnectionState::Disconnected);
                self.store.clear();
            }
            SocketEvent::Message(message) => self.handle_server_event(message),
        }
    }

    fn handle_server_event(&self, event: ServerEvent) {
        match event {
            ServerEvent::InitialState(value) => match snapshot_from_value(value) {
                Ok(states) => {
                    debug!("received initial state");
                    self.store.replace(states);
                }
                Err(e) => warn!(error = %e, "dropping initial state"),
            },
            ServerEvent::StateChanged(change) => match DeviceUpdate::try_from(change) {
                Ok(update) => {
                    let device = update.device_id();
                    if self.store.apply(update) {
                        debug!(%device, "device state changed");
                    } else {
                        debug!(%device, "state change before initial state, dropped");
                    }
                }
                Err(e) => warn!(error = %e, "dropping state change"),
            },
            ServerEvent::Other { name, .. } => trace!(%name, "ignoring event"),
        }
    }
}

/// Apply transport events in receipt order until cancelled or the
/// transport gives up.
async fn session_task(
    inner: Arc<RemoteInner>,
    mut events: mpsc::UnboundedReceiver<SocketEvent>,
    emitter: Emitter,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = events.recv() => event,
        };
        let Some(event) = event else {
            warn!("transport stopped, giving up on the remote");
            break;
        };
        inner.handle_socket_event(event, &emitter);
    }
    inner.end_session();
}
