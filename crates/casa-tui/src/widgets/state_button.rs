//! Two-state toggle button: green when on, red when off.
//!
//! The button is stateless. It renders whatever state it is given and,
//! when pressed, reports the state the user asked for. Nothing changes
//! on screen until the caller feeds it a new state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme;

#[derive(Debug, Clone, Copy)]
pub struct StateButton<'a> {
    state: bool,
    icon: &'a str,
    label: &'a str,
    focused: bool,
}

impl<'a> StateButton<'a> {
    pub fn new(state: bool, icon: &'a str, label: &'a str) -> Self {
        Self {
            state,
            icon,
            label,
            focused: false,
        }
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Activate the button: calls `on_click` with the requested new state.
    pub fn press<R>(&self, on_click: impl FnOnce(bool) -> R) -> R {
        on_click(!self.state)
    }
}

impl Widget for StateButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let marker = if self.focused { "▶ " } else { "  " };
        let mut style = theme::button(self.state);
        if self.focused {
            style = style.add_modifier(Modifier::BOLD);
        }

        Line::from(vec![
            Span::styled(marker, theme::focus_marker()),
            Span::styled(format!(" {} {} ", self.icon, self.label), style),
        ])
        .render(area, buf);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn press_requests_the_opposite_state() {
        assert!(StateButton::new(false, "◎", "Lights").press(|on| on));
        assert!(!StateButton::new(true, "◎", "Lights").press(|on| on));
    }

    #[test]
    fn press_calls_back_exactly_once() {
        let mut calls = Vec::new();
        StateButton::new(true, "▣", "TV").press(|on| calls.push(on));
        assert_eq!(calls, vec![false]);
    }

    #[test]
    fn renders_green_when_on_and_red_when_off() {
        let area = Rect::new(0, 0, 16, 1);

        let mut buf = Buffer::empty(area);
        StateButton::new(true, "◎", "Lights").render(area, &mut buf);
        assert_eq!(buf[(3, 0)].bg, theme::ON_GREEN);

        let mut buf = Buffer::empty(area);
        StateButton::new(false, "◎", "Lights").render(area, &mut buf);
        assert_eq!(buf[(3, 0)].bg, theme::OFF_RED);
    }

    #[test]
    fn focus_adds_a_marker() {
        let area = Rect::new(0, 0, 16, 1);
        let mut buf = Buffer::empty(area);
        StateButton::new(true, "◎", "Lights")
            .focused(true)
            .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "▶");
    }
}
