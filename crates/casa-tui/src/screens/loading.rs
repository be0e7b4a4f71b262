//! Shown while connected but before the first snapshot arrives.

use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

#[derive(Default)]
pub struct LoadingScreen {
    throbber_state: ThrobberState,
}

impl Component for LoadingScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::Tick = action {
            self.throbber_state.calc_next();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [line] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);

        let throbber = Throbber::default()
            .label(" Loading device states...")
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, line, &mut self.throbber_state.clone());
    }
}
