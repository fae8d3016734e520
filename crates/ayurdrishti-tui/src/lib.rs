//! Terminal front end for AyurDrishti: plant identification and Ayurveda chat.
//! All request/response state lives in `ayurdrishti-core`; this crate owns the
//! terminal, key handling and rendering.

pub mod app;
pub mod handler;
pub mod input;
pub mod logging;
pub mod oneshot;
pub mod tui;
pub mod ui;

pub use app::{App, BackendHealth, InputMode, Notice};
