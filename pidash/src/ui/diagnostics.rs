//! Diagnostics panel: newest entries first.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::diagnostics::Diagnostics;
use crate::ui::theme::{DIAG_TEXT, DIAG_TIME};

pub fn draw_diagnostics(f: &mut ratatui::Frame<'_>, area: Rect, diag: &Diagnostics) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = diag
        .recent()
        .take(visible)
        .map(|e| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", e.at.format("%H:%M:%S")),
                    Style::default().fg(DIAG_TIME),
                ),
                Span::styled(e.text.clone(), Style::default().fg(DIAG_TEXT)),
            ])
        })
        .collect();
    let title = format!("Diagnostics ({})", diag.len());
    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
