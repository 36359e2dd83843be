//! Top header with the API host and when the snapshot was last loaded.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

pub fn header_title(host: &str, last_loaded: Option<DateTime<Local>>, loading: bool) -> String {
    let status = match (loading, last_loaded) {
        (true, _) => "loading...".to_string(),
        (false, Some(t)) => format!("loaded {}", t.format("%H:%M:%S")),
        (false, None) => "no data".to_string(),
    };
    format!("pidash — host: {host} | {status}  (press 'q' to quit)")
}

pub fn draw_header(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    host: &str,
    last_loaded: Option<DateTime<Local>>,
    loading: bool,
) {
    let title = header_title(host, last_loaded, loading);
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
