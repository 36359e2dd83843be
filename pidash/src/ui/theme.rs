//! Shared UI theme constants.

use ratatui::style::Color;

pub const LABEL: Color = Color::Rgb(170, 170, 180);
pub const VALUE: Color = Color::Cyan;
pub const PLACEHOLDER: Color = Color::DarkGray;

// Buttons
pub const BTN_DANGER: Color = Color::Red;
pub const BTN_NORMAL: Color = Color::Yellow;
pub const BTN_BUSY: Color = Color::DarkGray;

pub const DIAG_TIME: Color = Color::DarkGray;
pub const DIAG_TEXT: Color = Color::LightRed;

pub const DIALOG_BORDER: Color = Color::LightYellow;
