//! Shutdown / Update buttons. A button with a request in flight is drawn
//! disabled.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::action::Action;
use crate::ui::theme::{BTN_BUSY, BTN_DANGER, BTN_NORMAL};

pub fn button_caption(action: Action, busy: bool) -> String {
    if busy {
        format!("{}...", action.label())
    } else {
        format!("[{}] {}", hotkey(action), action.label())
    }
}

pub fn hotkey(action: Action) -> char {
    match action {
        Action::Shutdown => 's',
        Action::Update => 'u',
    }
}

pub fn draw_buttons(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    focus: Action,
    busy: impl Fn(Action) -> bool,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (action, slot) in Action::ALL.into_iter().zip(cols.iter()) {
        let is_busy = busy(action);
        let color = if is_busy {
            BTN_BUSY
        } else if action == Action::Shutdown {
            BTN_DANGER
        } else {
            BTN_NORMAL
        };
        let mut border = Style::default().fg(color);
        if action == focus && !is_busy {
            border = border.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let p = Paragraph::new(Line::from(button_caption(action, is_busy)).centered())
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(p, *slot);
    }
}
