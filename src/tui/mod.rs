//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single-screen calculator: nine feature inputs, a calculate action, and
//! the resulting risk or error message.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::FieldTheme;
