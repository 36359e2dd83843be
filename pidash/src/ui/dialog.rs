//! Modal dialogs drawn over the dashboard: masked prompt, yes/no confirm,
//! and a notice that must be acknowledged.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::theme::DIALOG_BORDER;
use crate::ui::util::{centered_rect, mask};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Prompt { message: String, input: String },
    Confirm { message: String },
    Notice { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// Prompt accepted (`Some`) or cancelled (`None`).
    Text(Option<String>),
    Answer(bool),
    Dismissed,
}

impl Dialog {
    pub fn prompt(message: &str) -> Self {
        Dialog::Prompt {
            message: message.to_string(),
            input: String::new(),
        }
    }

    pub fn confirm(message: &str) -> Self {
        Dialog::Confirm {
            message: message.to_string(),
        }
    }

    pub fn notice(message: &str) -> Self {
        Dialog::Notice {
            message: message.to_string(),
        }
    }

    /// Feed one key; returns the result once the dialog is closed.
    pub fn handle_key(&mut self, k: KeyEvent) -> Option<DialogResult> {
        if k.kind != KeyEventKind::Press {
            return None;
        }
        match self {
            Dialog::Prompt { input, .. } => match k.code {
                KeyCode::Enter => Some(DialogResult::Text(Some(std::mem::take(input)))),
                KeyCode::Esc => Some(DialogResult::Text(None)),
                KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(DialogResult::Text(None))
                }
                KeyCode::Backspace => {
                    input.pop();
                    None
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    None
                }
                _ => None,
            },
            Dialog::Confirm { .. } => match k.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    Some(DialogResult::Answer(true))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(DialogResult::Answer(false))
                }
                _ => None,
            },
            Dialog::Notice { .. } => Some(DialogResult::Dismissed),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Dialog::Prompt { .. } => "API key",
            Dialog::Confirm { .. } => "Confirm",
            Dialog::Notice { .. } => "Message",
        }
    }

    fn body(&self) -> Vec<Line<'_>> {
        let hint = Style::default().add_modifier(Modifier::DIM);
        match self {
            Dialog::Prompt { message, input } => vec![
                Line::from(message.as_str()),
                Line::from(""),
                Line::from(vec![
                    Span::raw("> "),
                    Span::styled(mask(input), Style::default().add_modifier(Modifier::BOLD)),
                ]),
                Line::from(""),
                Line::styled("Enter: OK   Esc: cancel", hint),
            ],
            Dialog::Confirm { message } => vec![
                Line::from(message.as_str()),
                Line::from(""),
                Line::styled("y: yes   n/Esc: no", hint),
            ],
            Dialog::Notice { message } => vec![
                Line::from(message.as_str()),
                Line::from(""),
                Line::styled("press any key", hint),
            ],
        }
    }
}

const DIALOG_WIDTH: u16 = 56;
const DIALOG_MIN_HEIGHT: u16 = 9;

// Greedy word wrap; one spare row per wrapped line absorbs differences
// from the paragraph's own wrapper.
fn wrapped_rows(text: &str, inner: usize) -> usize {
    let (mut rows, mut col) = (1, 0);
    for word in text.split(' ') {
        let w = word.chars().count();
        let need = if col == 0 { w } else { col + 1 + w };
        if need <= inner {
            col = need;
        } else {
            rows += 1 + (w.saturating_sub(1) / inner);
            col = w % inner;
        }
    }
    if rows > 1 {
        rows + 1
    } else {
        rows
    }
}

// Rows needed for `lines` wrapped at `inner` columns, plus the border.
fn wrapped_height(lines: &[Line<'_>], inner: u16) -> u16 {
    let inner = usize::from(inner.max(1));
    let rows: usize = lines
        .iter()
        .map(|l| {
            let text: String = l.spans.iter().map(|s| s.content.as_ref()).collect();
            wrapped_rows(&text, inner)
        })
        .sum();
    u16::try_from(rows + 2).unwrap_or(u16::MAX)
}

pub fn draw_dialog(f: &mut ratatui::Frame<'_>, dialog: &Dialog) {
    let body = dialog.body();
    let width = DIALOG_WIDTH.min(f.area().width);
    let height = wrapped_height(&body, width.saturating_sub(2)).max(DIALOG_MIN_HEIGHT);
    let area: Rect = centered_rect(width, height, f.area());
    f.render_widget(Clear, area);
    let p = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(DIALOG_BORDER))
                .title(dialog.title()),
        );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(d: &mut Dialog, s: &str) {
        for c in s.chars() {
            assert_eq!(d.handle_key(key(KeyCode::Char(c))), None);
        }
    }

    #[test]
    fn prompt_collects_and_edits_input() {
        let mut d = Dialog::prompt("key?");
        type_str(&mut d, "abcx");
        d.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            d.handle_key(key(KeyCode::Enter)),
            Some(DialogResult::Text(Some("abc".into())))
        );
    }

    #[test]
    fn prompt_escape_cancels() {
        let mut d = Dialog::prompt("key?");
        type_str(&mut d, "abc");
        assert_eq!(
            d.handle_key(key(KeyCode::Esc)),
            Some(DialogResult::Text(None))
        );
    }

    #[test]
    fn confirm_answers() {
        let mut d = Dialog::confirm("sure?");
        assert_eq!(d.handle_key(key(KeyCode::Char('x'))), None);
        assert_eq!(
            d.handle_key(key(KeyCode::Char('y'))),
            Some(DialogResult::Answer(true))
        );
        assert_eq!(
            Dialog::confirm("sure?").handle_key(key(KeyCode::Esc)),
            Some(DialogResult::Answer(false))
        );
    }

    #[test]
    fn notice_closes_on_any_key() {
        assert_eq!(
            Dialog::notice("done").handle_key(key(KeyCode::Char('z'))),
            Some(DialogResult::Dismissed)
        );
    }

    #[test]
    fn prompt_input_is_masked_on_screen() {
        let mut d = Dialog::prompt("Enter API key");
        type_str(&mut d, "hunter2");
        let mut term = Terminal::new(TestBackend::new(60, 12)).unwrap();
        term.draw(|f| draw_dialog(f, &d)).unwrap();
        let text: String = term
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("*******"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn short_lines_take_one_row() {
        assert_eq!(wrapped_rows("done", 54), 1);
        assert_eq!(wrapped_rows("", 54), 1);
        assert!(wrapped_rows(&"word ".repeat(60), 54) >= 6);
    }

    #[test]
    fn long_notice_grows_to_fit() {
        let tail = "END-OF-MESSAGE";
        let message = format!("{} {tail}", "word ".repeat(60));
        let d = Dialog::notice(&message);
        let mut term = Terminal::new(TestBackend::new(60, 24)).unwrap();
        term.draw(|f| draw_dialog(f, &d)).unwrap();
        let text: String = term
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains(tail));
        assert!(text.contains("press any key"));
    }

    #[test]
    fn dialog_height_is_clamped_to_screen() {
        let d = Dialog::notice(&"x".repeat(2000));
        let mut term = Terminal::new(TestBackend::new(60, 12)).unwrap();
        term.draw(|f| draw_dialog(f, &d)).unwrap();
    }
}
