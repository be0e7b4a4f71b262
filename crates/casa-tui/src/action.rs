//! All possible UI actions. Actions are the sole mechanism for state mutation.

use casa_core::{ConnectionState, DeviceUpdate, Snapshot};

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    ToggleHelp,

    // ── Data Events (from casa-core) ──────────────────────────────
    ConnectionChanged(ConnectionState),
    SnapshotUpdated(Snapshot),

    // ── Device Requests ───────────────────────────────────────────
    /// Propose a device change to the remote. Never applied locally.
    RequestUpdate(DeviceUpdate),
}
