//! Data bridge: connects [`Remote`] observers to TUI actions.
//!
//! Runs as a background task: starts the remote session, then forwards
//! every connection-state transition and snapshot change as an [`Action`]
//! through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use casa_core::{ConnectionState, Remote};

use crate::action::Action;

/// Run the data bridge until cancelled, then disconnect the remote.
pub async fn spawn_data_bridge(
    remote: Remote,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut conn_state = remote.connection_state();
    let mut snapshots = remote.snapshot();

    if let Err(e) = remote.connect().await {
        warn!(error = %e, "failed to start remote session");
        let _ = action_tx.send(Action::ConnectionChanged(ConnectionState::Disconnected));
    }

    // Push the current values so the UI starts from the truth
    let _ = action_tx.send(Action::ConnectionChanged(*conn_state.borrow_and_update()));
    let _ = action_tx.send(Action::SnapshotUpdated(snapshots.latest()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = conn_state.changed() => {
                let state = *conn_state.borrow_and_update();
                debug!(?state, "dispatching ConnectionChanged");
                let _ = action_tx.send(Action::ConnectionChanged(state));
            }
            Some(snapshot) = snapshots.changed() => {
                debug!(present = snapshot.is_some(), "dispatching SnapshotUpdated");
                let _ = action_tx.send(Action::SnapshotUpdated(snapshot));
            }
        }
    }

    remote.disconnect().await;
    debug!("data bridge shut down");
}
