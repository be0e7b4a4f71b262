//! Dashboard: one panel per room with a toggle for every switchable
//! device and an adjuster for every numeric setting whose device is on.
//!
//! The screen only ever renders the snapshot it was last handed. Key
//! presses turn into `Action::RequestUpdate`; the visible state changes
//! when the remote's push comes back as a new snapshot.

use std::sync::Arc;

use casa_core::intent::{self, Setting, Step};
use casa_core::{DeviceId, DeviceStates, RoomId, Snapshot};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{Adjuster, AdjusterStyle, StateButton};

/// Side-by-side panels need at least this many columns.
const WIDE_LAYOUT_MIN_WIDTH: u16 = 90;

/// One line inside a room panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Button(DeviceId),
    Adjuster(Setting),
    FridgeReadout,
    FridgeAlert,
}

pub struct HomeScreen {
    snapshot: Snapshot,
    focused: DeviceId,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            focused: DeviceId::LivingRoomLights,
        }
    }

    #[cfg(test)]
    pub fn focused_device(&self) -> DeviceId {
        self.focused
    }

    /// Switchable devices in focus order.
    fn focus_order() -> impl Iterator<Item = DeviceId> {
        DeviceId::ALL.into_iter().filter(|d| d.is_switchable())
    }

    fn move_focus(&mut self, forward: bool) {
        let order: Vec<DeviceId> = Self::focus_order().collect();
        let idx = order.iter().position(|&d| d == self.focused).unwrap_or(0);
        let next = if forward {
            (idx + 1) % order.len()
        } else {
            (idx + order.len() - 1) % order.len()
        };
        self.focused = order[next];
    }

    fn states(&self) -> Option<&Arc<DeviceStates>> {
        self.snapshot.as_ref()
    }

    /// Press the focused toggle.
    fn activate(&self) -> Option<Action> {
        let states = self.states()?;
        let active = states.is_active(self.focused)?;
        let (icon, label) = (icon(self.focused), self.focused.label());
        StateButton::new(active, icon, label)
            .press(|on| intent::switch(states, self.focused, on))
            .map(Action::RequestUpdate)
    }

    /// Step the focused device's setting, if it has one on screen.
    fn adjust(&self, step: Step) -> Option<Action> {
        let states = self.states()?;
        let setting = Setting::for_device(self.focused)?;
        if !setting.is_visible(states) {
            return None;
        }
        Some(Action::RequestUpdate(intent::adjust(states, setting, step)))
    }

    fn rows(states: &DeviceStates, room: RoomId) -> Vec<Row> {
        let mut rows = Vec::new();
        if room == RoomId::Kitchen {
            rows.push(Row::FridgeReadout);
            if states.kitchen.fridge.alert {
                rows.push(Row::FridgeAlert);
            }
        }
        for device in room.devices().filter(|d| d.is_switchable()) {
            rows.push(Row::Button(device));
            if let Some(setting) = Setting::for_device(device) {
                if setting.is_visible(states) {
                    rows.push(Row::Adjuster(setting));
                }
            }
        }
        rows
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_header(frame: &mut Frame, area: Rect) {
        let [title_area, legend_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled("Smart Home · Remote Control", theme::title_style()))
                .alignment(Alignment::Center),
            title_area,
        );

        let legend = Line::from(vec![
            Span::styled("●", Style::default().fg(theme::OFF_RED)),
            Span::styled(" Off   ", theme::text()),
            Span::styled("●", Style::default().fg(theme::ON_GREEN)),
            Span::styled(" On", theme::text()),
        ]);
        frame.render_widget(
            Paragraph::new(legend).alignment(Alignment::Center),
            legend_area,
        );
    }

    fn render_room(&self, frame: &mut Frame, area: Rect, states: &DeviceStates, room: RoomId) {
        let has_focus = self.focused.room() == room;
        let block = Block::default()
            .title(format!(" {} ", room.label()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if has_focus {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for (i, row) in Self::rows(states, room).into_iter().enumerate() {
            let Ok(offset) = u16::try_from(i) else { break };
            if offset >= inner.height {
                break;
            }
            let line = Rect::new(inner.x, inner.y + offset, inner.width, 1);
            self.render_row(frame, line, states, row);
        }
    }

    fn render_row(&self, frame: &mut Frame, area: Rect, states: &DeviceStates, row: Row) {
        match row {
            Row::Button(device) => {
                let active = states.is_active(device).unwrap_or(false);
                let button = StateButton::new(active, icon(device), device.label())
                    .focused(device == self.focused);
                frame.render_widget(button, area);
            }
            Row::Adjuster(setting) => {
                let style = if setting == Setting::TvChannel {
                    AdjusterStyle::Chevrons
                } else {
                    AdjusterStyle::PlusMinus
                };
                let adjuster = Adjuster::new(setting.label(), setting.value(states), style)
                    .unit(setting.unit())
                    .focused(setting.device() == self.focused);
                frame.render_widget(adjuster, area);
            }
            Row::FridgeReadout => {
                let line = Line::from(vec![
                    Span::styled(format!("   {} ", icon(DeviceId::Fridge)), theme::text()),
                    Span::styled(
                        format!("Fridge: {}°C", states.kitchen.fridge.temperature),
                        theme::text(),
                    ),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            Row::FridgeAlert => {
                frame.render_widget(
                    Paragraph::new(Span::styled("   ⚠ Alert: too warm!", theme::alert())),
                    area,
                );
            }
        }
    }
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn icon(device: DeviceId) -> &'static str {
    match device {
        DeviceId::LivingRoomLights | DeviceId::KitchenLights | DeviceId::RoomLights => "◎",
        DeviceId::Tv => "▣",
        DeviceId::AirConditioning | DeviceId::Fridge => "❄",
        DeviceId::Stove => "♨",
        DeviceId::Fan => "✣",
        DeviceId::Curtains => "☀",
    }
}

impl Component for HomeScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Right | KeyCode::Char('+' | '=') => self.adjust(Step::Increment),
            KeyCode::Left | KeyCode::Char('-') => self.adjust(Step::Decrement),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => self.snapshot.clone_from(snapshot),
            Action::FocusNext => self.move_focus(true),
            Action::FocusPrev => self.move_focus(false),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(states) = self.states() else {
            return;
        };

        let [header_area, rooms_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        Self::render_header(frame, header_area);

        let room_areas: [Rect; 3] = if rooms_area.width >= WIDE_LAYOUT_MIN_WIDTH {
            Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(rooms_area)
        } else {
            Layout::vertical([Constraint::Ratio(1, 3); 3]).areas(rooms_area)
        };

        for (room, room_area) in RoomId::ALL.into_iter().zip(room_areas) {
            self.render_room(frame, room_area, states, room);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use casa_core::{
        BedroomDevice, DeviceUpdate, LivingRoomDevice, Power, Television,
    };
    use crossterm::event::KeyModifiers;
    use pretty_assertions::{assert_eq, assert_ne};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn states() -> DeviceStates {
        let mut states = DeviceStates::default();
        states.living_room.tv = Television {
            state: Power::On,
            channel: 5,
        };
        states.kitchen.fridge.temperature = 4;
        states
    }

    fn screen_with(states: DeviceStates) -> HomeScreen {
        let mut screen = HomeScreen::new();
        screen
            .update(&Action::SnapshotUpdated(Some(Arc::new(states))))
            .unwrap();
        screen
    }

    fn draw(screen: &HomeScreen, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_owned()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Background of the first cell of the button labelled `label`.
    fn button_bg(buf: &Buffer, label: &str) -> ratatui::style::Color {
        let area = buf.area;
        for y in 0..area.height {
            let row: Vec<&str> = (0..area.width).map(|x| buf[(x, y)].symbol()).collect();
            let line = row.concat();
            if let Some(byte_idx) = line.find(label) {
                let col = line[..byte_idx].chars().count();
                return buf[(u16::try_from(col).unwrap(), y)].bg;
            }
        }
        panic!("no button labelled {label}");
    }

    #[test]
    fn enter_requests_the_opposite_state() {
        let mut screen = screen_with(states());
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::RequestUpdate(DeviceUpdate::LivingRoom(
                LivingRoomDevice::Lights(Power::On)
            )))
        );
    }

    #[test]
    fn toggle_does_not_change_rendering_until_push() {
        let mut screen = screen_with(states());
        let before = draw(&screen, 100, 20);
        assert_eq!(button_bg(&before, "Lights"), theme::OFF_RED);

        let action = screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(matches!(action, Some(Action::RequestUpdate(_))));
        assert_eq!(draw(&screen, 100, 20), before);

        let mut pushed = states();
        pushed.living_room.lights = Power::On;
        screen
            .update(&Action::SnapshotUpdated(Some(Arc::new(pushed))))
            .unwrap();
        assert_eq!(button_bg(&draw(&screen, 100, 20), "Lights"), theme::ON_GREEN);
    }

    #[test]
    fn increment_channel_keeps_tv_on() {
        let mut screen = screen_with(states());
        screen.update(&Action::FocusNext).unwrap();
        assert_eq!(screen.focused_device(), DeviceId::Tv);

        let action = screen.handle_key_event(key(KeyCode::Char('+'))).unwrap();
        assert_eq!(
            action,
            Some(Action::RequestUpdate(DeviceUpdate::LivingRoom(
                LivingRoomDevice::Tv(Television {
                    state: Power::On,
                    channel: 6,
                })
            )))
        );
    }

    #[test]
    fn adjust_is_ignored_while_device_is_off() {
        let mut screen = screen_with(states());
        // Focus the air conditioning, which is off.
        screen.update(&Action::FocusNext).unwrap();
        screen.update(&Action::FocusNext).unwrap();
        assert_eq!(screen.focused_device(), DeviceId::AirConditioning);
        assert_eq!(screen.handle_key_event(key(KeyCode::Right)).unwrap(), None);
    }

    #[test]
    fn focus_wraps_and_skips_the_fridge() {
        let mut screen = screen_with(states());
        screen.update(&Action::FocusPrev).unwrap();
        assert_eq!(screen.focused_device(), DeviceId::Curtains);

        for _ in 0..4 {
            screen.update(&Action::FocusNext).unwrap();
        }
        assert_eq!(screen.focused_device(), DeviceId::KitchenLights);
        screen.update(&Action::FocusNext).unwrap();
        assert_eq!(screen.focused_device(), DeviceId::Stove);
    }

    #[test]
    fn navigation_keys_map_to_focus_actions() {
        let mut screen = screen_with(states());
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Char('j'))).unwrap(),
            Some(Action::FocusNext)
        );
        assert_eq!(
            screen.handle_key_event(key(KeyCode::BackTab)).unwrap(),
            Some(Action::FocusPrev)
        );
    }

    #[test]
    fn curtains_toggle_requests_open() {
        let mut screen = screen_with(states());
        screen.update(&Action::FocusPrev).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(
            action,
            Some(Action::RequestUpdate(DeviceUpdate::Room(
                BedroomDevice::Curtains(casa_core::CurtainPosition::Open)
            )))
        );
    }

    #[test]
    fn dashboard_shows_rooms_legend_and_visible_adjusters() {
        let screen = screen_with(states());
        let screen_text = text(&draw(&screen, 100, 20));

        assert!(screen_text.contains("Smart Home · Remote Control"), "{screen_text}");
        assert!(screen_text.contains("● Off   ● On"), "{screen_text}");
        for room in ["Living Room", "Kitchen", "Bedroom"] {
            assert!(screen_text.contains(room), "{screen_text}");
        }
        assert!(screen_text.contains("Channel: 5  ◀ ▶"), "{screen_text}");
        assert!(!screen_text.contains("Temperature:"), "{screen_text}");
        assert!(screen_text.contains("Fridge: 4°C"), "{screen_text}");
        assert!(!screen_text.contains("too warm"), "{screen_text}");
    }

    #[test]
    fn fridge_alert_is_shown_when_too_warm() {
        let mut warm = states();
        warm.kitchen.fridge.alert = true;
        let mut screen = screen_with(warm);
        let screen_text = text(&draw(&screen, 100, 20));
        assert!(screen_text.contains("Alert: too warm!"), "{screen_text}");

        // The fridge is read-only and never takes focus.
        for _ in 0..DeviceId::ALL.len() * 2 {
            screen.update(&Action::FocusNext).unwrap();
            assert_ne!(screen.focused_device(), DeviceId::Fridge);
        }
    }

    #[test]
    fn narrow_terminals_stack_rooms() {
        let screen = screen_with(states());
        let screen_text = text(&draw(&screen, 40, 36));
        let living = screen_text.find("Living Room").unwrap();
        let kitchen = screen_text.find("Kitchen").unwrap();
        let bedroom = screen_text.find("Bedroom").unwrap();
        assert!(living < kitchen && kitchen < bedroom);
    }

    #[test]
    fn keys_do_nothing_without_a_snapshot() {
        let mut screen = HomeScreen::new();
        assert_eq!(screen.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
        assert_eq!(screen.handle_key_event(key(KeyCode::Char('+'))).unwrap(), None);
    }
}
