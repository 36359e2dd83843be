//! UI module root: exposes drawing functions for individual panels.

pub mod buttons;
pub mod diagnostics;
pub mod dialog;
pub mod fields;
pub mod header;
pub mod theme;
pub mod util;
