//! Screen implementations. Exactly one is shown at a time, chosen from
//! the connection state and whether a snapshot has arrived.

pub mod connecting;
pub mod home;
pub mod loading;

use casa_core::ConnectionState;

pub use connecting::ConnectingScreen;
pub use home::HomeScreen;
pub use loading::LoadingScreen;

/// Which screen the app shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Connecting,
    Loading,
    Dashboard,
}

impl View {
    /// Anything but a live connection shows the connecting screen, even if
    /// a snapshot is still cached. Connected without a snapshot is loading.
    pub fn select(state: ConnectionState, has_snapshot: bool) -> Self {
        match (state, has_snapshot) {
            (ConnectionState::Connected, true) => Self::Dashboard,
            (ConnectionState::Connected, false) => Self::Loading,
            _ => Self::Connecting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn view_follows_connection_then_snapshot() {
        assert_eq!(View::select(ConnectionState::Connecting, false), View::Connecting);
        assert_eq!(View::select(ConnectionState::Connected, false), View::Loading);
        assert_eq!(View::select(ConnectionState::Connected, true), View::Dashboard);
    }

    #[test]
    fn lost_connection_hides_cached_snapshot() {
        assert_eq!(View::select(ConnectionState::Disconnected, true), View::Connecting);
        assert_eq!(
            View::select(ConnectionState::Reconnecting { attempt: 3 }, true),
            View::Connecting
        );
    }
}
