//! User display settings.
//!
//! Each setting is stored under its own key as a JSON value, in
//! localStorage on the web and in memory elsewhere. Every change is written
//! through immediately.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

const SHOW_TAXON_IMAGE_KEY: &str = "showTaxonImage";
const SHOW_TAXON_RANGE_KEY: &str = "showTaxonRange";
const SHOW_CONSERVATION_STATUS_KEY: &str = "showConservationStatus";
const WIKIMEDIA_USERNAME_KEY: &str = "wikimedia-username";

/// A string key-value store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// Store backed by a `HashMap`, used on native targets and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Browser localStorage.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        match web_sys::window()?.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("localStorage unavailable: {:?}", e);
                None
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            log::warn!("Failed to save {} to localStorage: {:?}", key, e);
        }
    }
}

/// The store used by the application on the current platform.
#[cfg(target_arch = "wasm32")]
pub type PlatformStore = LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = MemoryStore;

/// Display toggles and the Wikimedia account name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub show_taxon_image: bool,
    pub show_taxon_range: bool,
    pub show_conservation_status: bool,
    pub wikimedia_username: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_taxon_image: true,
            show_taxon_range: true,
            show_conservation_status: true,
            wikimedia_username: String::new(),
        }
    }
}

/// Settings kept in sync with a [`KeyValueStore`].
pub struct SettingsStore<K: KeyValueStore> {
    store: K,
    settings: Settings,
}

impl<K: KeyValueStore> SettingsStore<K> {
    /// Reads every setting from `store`, falling back to defaults for
    /// missing or unreadable entries.
    pub fn load(store: K) -> Self {
        let defaults = Settings::default();
        let settings = Settings {
            show_taxon_image: load_value(&store, SHOW_TAXON_IMAGE_KEY, defaults.show_taxon_image),
            show_taxon_range: load_value(&store, SHOW_TAXON_RANGE_KEY, defaults.show_taxon_range),
            show_conservation_status: load_value(
                &store,
                SHOW_CONSERVATION_STATUS_KEY,
                defaults.show_conservation_status,
            ),
            wikimedia_username: load_value(
                &store,
                WIKIMEDIA_USERNAME_KEY,
                defaults.wikimedia_username,
            ),
        };
        log::info!("Loaded settings: {:?}", settings);
        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_show_taxon_image(&mut self, value: bool) {
        self.settings.show_taxon_image = value;
        save_value(&mut self.store, SHOW_TAXON_IMAGE_KEY, &value);
    }

    pub fn set_show_taxon_range(&mut self, value: bool) {
        self.settings.show_taxon_range = value;
        save_value(&mut self.store, SHOW_TAXON_RANGE_KEY, &value);
    }

    pub fn set_show_conservation_status(&mut self, value: bool) {
        self.settings.show_conservation_status = value;
        save_value(&mut self.store, SHOW_CONSERVATION_STATUS_KEY, &value);
    }

    pub fn set_wikimedia_username(&mut self, value: impl Into<String>) {
        self.settings.wikimedia_username = value.into();
        save_value(
            &mut self.store,
            WIKIMEDIA_USERNAME_KEY,
            &self.settings.wikimedia_username,
        );
    }

    /// Writes every field of `settings` that differs from the current one.
    ///
    /// Returns true if anything changed.
    pub fn apply(&mut self, settings: &Settings) -> bool {
        let mut changed = false;
        if settings.show_taxon_image != self.settings.show_taxon_image {
            self.set_show_taxon_image(settings.show_taxon_image);
            changed = true;
        }
        if settings.show_taxon_range != self.settings.show_taxon_range {
            self.set_show_taxon_range(settings.show_taxon_range);
            changed = true;
        }
        if settings.show_conservation_status != self.settings.show_conservation_status {
            self.set_show_conservation_status(settings.show_conservation_status);
            changed = true;
        }
        if settings.wikimedia_username != self.settings.wikimedia_username {
            self.set_wikimedia_username(settings.wikimedia_username.clone());
            changed = true;
        }
        changed
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

fn load_value<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str, default: T) -> T {
    let Some(raw) = store.get_item(key) else {
        return default;
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring unreadable setting {}={:?}: {}", key, raw, e);
            default
        }
    }
}

fn save_value<T: Serialize + ?Sized>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set_item(key, &json),
        Err(e) => log::warn!("Failed to serialize setting {}: {}", key, e),
    }
}
