//! Application core: event loop, view selection, action dispatch.

use std::time::Duration;

use casa_core::{ConnectionState, Remote, Snapshot};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screens::{ConnectingScreen, HomeScreen, LoadingScreen, View};
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    remote: Remote,
    connection: ConnectionState,
    snapshot: Snapshot,
    connecting: ConnectingScreen,
    loading: LoadingScreen,
    home: HomeScreen,
    running: bool,
    help_visible: bool,
    /// Action sender, shared with the data bridge.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver, drained by the main loop.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(remote: Remote) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let endpoint = remote.config().endpoint.to_string();

        Self {
            remote,
            connection: ConnectionState::Disconnected,
            snapshot: None,
            connecting: ConnectingScreen::new(endpoint),
            loading: LoadingScreen::default(),
            home: HomeScreen::new(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
        }
    }

    fn view(&self) -> View {
        View::select(self.connection, self.snapshot.is_some())
    }

    fn active_screen(&mut self) -> &mut dyn Component {
        match self.view() {
            View::Connecting => &mut self.connecting,
            View::Loading => &mut self.loading,
            View::Dashboard => &mut self.home,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            self.remote.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(100), // throbber animation
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        cancel.cancel();
        if let Err(e) = bridge.await {
            warn!(error = %e, "data bridge ended abnormally");
        }
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                KeyCode::Char('q') => Ok(Some(Action::Quit)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.active_screen().handle_key_event(key)
    }

    /// Process a single action: update app state and propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        let follow_up = match action {
            Action::Quit => {
                self.running = false;
                None
            }
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
                None
            }
            Action::ConnectionChanged(state) => {
                debug!(?state, "connection state changed");
                self.connection = *state;
                self.connecting.update(action)?
            }
            Action::SnapshotUpdated(snapshot) => {
                self.snapshot.clone_from(snapshot);
                self.home.update(action)?
            }
            Action::RequestUpdate(update) => {
                // No user-visible error: the dashboard keeps showing the
                // remote's state, which is the only source of truth.
                if let Err(e) = self.remote.request_device_update(*update) {
                    warn!(error = %e, device = %update.device_id(), "device update not sent");
                }
                None
            }
            Action::Tick => {
                self.connecting.update(action)?;
                self.loading.update(action)?
            }
            Action::FocusNext | Action::FocusPrev => self.home.update(action)?,
            Action::Render | Action::Resize(..) => None,
        };

        if let Some(follow_up) = follow_up {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        match self.view() {
            View::Connecting => self.connecting.render(frame, content_area),
            View::Loading => self.loading.render(frame, content_area),
            View::Dashboard => self.home.render(frame, content_area),
        }

        self.render_status_bar(frame, status_area);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    /// Connection indicator plus key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection_indicator = match self.connection {
            ConnectionState::Connected => {
                Span::styled("● connected", Style::default().fg(theme::SUCCESS_GREEN))
            }
            ConnectionState::Disconnected => {
                Span::styled("○ disconnected", Style::default().fg(theme::ERROR_RED))
            }
            ConnectionState::Reconnecting { .. } => {
                Span::styled("◐ reconnecting", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
            ConnectionState::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
        };

        let hints = Span::styled(" │ ? help  q quit", theme::key_hint());
        let line = Line::from(vec![Span::raw(" "), connection_indicator, hints]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 46u16.min(area.width.saturating_sub(4));
        let help_height = 12u16.min(area.height.saturating_sub(2));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(keys, theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            entry("  j/k ↑/↓ Tab  ", "Move between devices"),
            entry("  Enter Space  ", "Switch on / off"),
            entry("  + - ← →      ", "Adjust setting"),
            entry("  ?            ", "This help"),
            entry("  q Ctrl+c     ", "Quit"),
            Line::from(""),
            Line::from(Span::styled("          Esc or ? to close", theme::key_hint())),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
