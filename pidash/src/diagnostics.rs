//! Bounded diagnostic log shown in the dashboard; every entry is also traced.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use tracing::warn;

pub const DIAGNOSTICS_CAP: usize = 100;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    while dq.len() >= cap.max(1) {
        dq.pop_front();
    }
    dq.push_back(v);
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub at: DateTime<Local>,
    pub text: String,
}

#[derive(Debug)]
pub struct Diagnostics {
    entries: VecDeque<Entry>,
    cap: usize,
}

impl Diagnostics {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn record(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!(target: "pidash::diagnostics", "{text}");
        push_capped(
            &mut self.entries,
            Entry {
                at: Local::now(),
                text,
            },
            self.cap,
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().rev()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DIAGNOSTICS_CAP)
    }
}
