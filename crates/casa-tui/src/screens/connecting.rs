//! Shown while there is no live connection to the remote.

use casa_core::ConnectionState;
use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct ConnectingScreen {
    endpoint: String,
    state: ConnectionState,
    throbber_state: ThrobberState,
}

impl ConnectingScreen {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            state: ConnectionState::Disconnected,
            throbber_state: ThrobberState::default(),
        }
    }

    fn detail(&self) -> String {
        match self.state {
            ConnectionState::Reconnecting { attempt } => {
                format!("  {} (retry {attempt})", self.endpoint)
            }
            _ => format!("  {}", self.endpoint),
        }
    }
}

impl Component for ConnectingScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber_state.calc_next(),
            Action::ConnectionChanged(state) => self.state = *state,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [throbber_area, detail_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);

        let throbber = Throbber::default()
            .label(" Connecting to server...")
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, throbber_area, &mut self.throbber_state.clone());

        frame.render_widget(
            Paragraph::new(Span::styled(self.detail(), theme::key_hint())),
            detail_area,
        );
    }
}
