//! Application state management.
//!
//! Holds what the UI panels read and edit: the active view, the interface
//! language, and the persisted display settings.

use crate::i18n::{translate, Locale, Message};
use crate::settings::{PlatformStore, SettingsStore};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Gallery,
    Settings,
}

/// Root application state.
pub struct AppState {
    pub view: View,
    pub locale: Locale,
    pub settings: SettingsStore<PlatformStore>,
    /// Status message displayed in the top bar.
    pub status_message: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::default(),
            locale: Locale::detect(),
            settings: SettingsStore::load(PlatformStore::default()),
            status_message: "Ready".to_string(),
        }
    }

    /// Translates `message` into the current interface language.
    pub fn t(&self, message: Message) -> &'static str {
        translate(self.locale, message)
    }
}
