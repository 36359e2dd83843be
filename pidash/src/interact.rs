//! User interaction capability: prompt for text, confirm, notify.
//!
//! Request logic only talks to this trait so it can run against the
//! terminal dialogs, plain stdio, or a scripted fake in tests.

use std::io::{self, BufRead, Write};

pub trait Interaction {
    /// Ask for a line of text. `None` when the user cancels.
    fn prompt(&mut self, message: &str) -> Option<String>;
    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
    /// Show a message the user has to acknowledge.
    fn notify(&mut self, message: &str);
}

/// Prompts on stderr and reads answers from the given input (stdin by default).
pub struct StdioInteraction<R> {
    input: R,
}

impl StdioInteraction<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> StdioInteraction<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        eprint!("{prompt}");
        let _ = io::stderr().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            // EOF counts as cancel
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead> Interaction for StdioInteraction<R> {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.read_line(&format!("{message}: "))
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.read_line(&format!("{message} [y/N]: "))
            .map(|l| matches!(l.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }
}
