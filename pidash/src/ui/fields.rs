//! The eight telemetry fields as a label/value table.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::ui::theme::{LABEL, PLACEHOLDER, VALUE};
use crate::ui::util::truncate_middle;
use crate::view::{DashboardView, PLACEHOLDER as EMPTY};

const LABEL_WIDTH: u16 = 16;

pub fn draw_fields(f: &mut ratatui::Frame<'_>, area: Rect, view: &DashboardView) {
    let value_width = area.width.saturating_sub(LABEL_WIDTH + 3) as usize;
    let rows = view.rows().map(|(id, value)| {
        let style = if value == EMPTY {
            Style::default().fg(PLACEHOLDER)
        } else {
            Style::default().fg(VALUE).add_modifier(Modifier::BOLD)
        };
        Row::new(vec![
            Cell::from(id.label()).style(Style::default().fg(LABEL)),
            Cell::from(truncate_middle(value, value_width.max(4))).style(style),
        ])
    });
    let table = Table::new(rows, [Constraint::Length(LABEL_WIDTH), Constraint::Min(4)])
        .block(Block::default().borders(Borders::ALL).title("Host"));
    f.render_widget(table, area);
}
