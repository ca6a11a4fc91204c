//! User preferences
//!
//! Persisted to LocalStorage on wasm so slider and checkbox survive reloads.
//! Game state itself is never persisted; a session is entirely in-memory.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VELOCITY, MAX_VELOCITY, MIN_VELOCITY};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Fall-speed slider value, applied to newly spawned dots
    pub velocity: i32,
    /// Brutal mode: a live dot exiting the bottom subtracts its points
    pub brutal: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
            brutal: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "dot_pop_settings";

    /// Clamp loaded/adjusted values back into the slider range.
    pub fn sanitize(&mut self) {
        self.velocity = self.velocity.clamp(MIN_VELOCITY, MAX_VELOCITY);
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(mut settings) = serde_json::from_str::<Settings>(&json) {
                    settings.sanitize();
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
