//! pidash: terminal dashboard for a Raspberry Pi metrics API.
//!
//! Loads one telemetry snapshot from `GET /api/all` into a fixed set of
//! fields and offers the key-protected `shutdown` and `update` actions.

pub mod action;
pub mod api;
pub mod app;
pub mod diagnostics;
pub mod error;
pub mod interact;
pub mod logging;
pub mod profiles;
pub mod types;
pub mod ui;
pub mod view;
