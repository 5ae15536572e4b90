//! UI modules for the species atlas viewer.
//!
//! The UI is split into distinct panels:
//! - Top bar: title, status, and navigation between views
//! - Gallery: one card per species with globe and range map
//! - Settings: display toggles, Wikimedia username, and language

mod colors;
mod gallery;
mod settings_panel;
mod top_bar;

pub use gallery::render_gallery;
pub use settings_panel::render_settings;
pub use top_bar::render_top_bar;
