//! Numeric read-out with step controls, e.g. `Channel: 5  ◀ ▶`.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme;

/// How the step controls are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjusterStyle {
    /// `◀ ▶`, for stepping through a list (TV channels).
    Chevrons,
    /// `+ −`, for quantities.
    PlusMinus,
}

#[derive(Debug, Clone, Copy)]
pub struct Adjuster<'a> {
    label: &'a str,
    value: i64,
    unit: Option<&'a str>,
    style: AdjusterStyle,
    focused: bool,
}

impl<'a> Adjuster<'a> {
    pub fn new(label: &'a str, value: i64, style: AdjusterStyle) -> Self {
        Self {
            label,
            value,
            unit: None,
            style,
            focused: false,
        }
    }

    #[must_use]
    pub fn unit(mut self, unit: Option<&'a str>) -> Self {
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for Adjuster<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controls = match self.style {
            AdjusterStyle::Chevrons => "◀ ▶",
            AdjusterStyle::PlusMinus => "+ −",
        };
        let control_style = if self.focused {
            theme::key_hint_key()
        } else {
            theme::key_hint()
        };

        Line::from(vec![
            Span::styled(
                format!("     {}: {}{}  ", self.label, self.value, self.unit.unwrap_or("")),
                theme::text(),
            ),
            Span::styled(controls, control_style),
        ])
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(adjuster: Adjuster<'_>) -> String {
        let area = Rect::new(0, 0, 32, 1);
        let mut buf = Buffer::empty(area);
        adjuster.render(area, &mut buf);
        (0..area.width)
            .map(|x| buf[(x, 0)].symbol())
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    #[test]
    fn channel_uses_chevrons() {
        let line = rendered(Adjuster::new("Channel", 5, AdjusterStyle::Chevrons));
        insta::assert_snapshot!(line, @"     Channel: 5  ◀ ▶");
    }

    #[test]
    fn temperature_shows_unit() {
        let line = rendered(
            Adjuster::new("Temperature", 22, AdjusterStyle::PlusMinus).unit(Some("°C")),
        );
        insta::assert_snapshot!(line, @"     Temperature: 22°C  + −");
    }
}
