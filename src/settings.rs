//! Player preferences
//!
//! Persisted in LocalStorage on the web, defaults everywhere else.

use serde::{Deserialize, Serialize};

/// Presentation settings; nothing here changes the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show FPS counter
    pub show_fps: bool,
    /// Dashed centerline circles
    pub line_markings: bool,
    /// Debug overlay of collision sample points
    pub show_hit_zones: bool,
    /// Fixed RNG seed instead of the clock (reproducible traffic)
    pub seed: Option<u64>,
    /// Balance overrides as a JSON blob, see `Tuning::from_json`
    pub tuning_json: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            line_markings: true,
            show_hit_zones: false,
            seed: None,
            tuning_json: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "oval_racer_settings";

    /// Seed to use for a new game, `now` when none is pinned
    pub fn seed_or(&self, now: u64) -> u64 {
        self.seed.unwrap_or(now)
    }

    /// Balance values for a new game; invalid overrides fall back to defaults
    pub fn tuning(&self) -> crate::Tuning {
        match self.tuning_json.as_deref().map(crate::Tuning::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(e)) => {
                log::warn!("Ignoring tuning override: {}", e);
                crate::Tuning::default()
            }
            None => crate::Tuning::default(),
        }
    }

    /// Flip the hit-zone overlay, returning the new value
    pub fn toggle_hit_zones(&mut self) -> bool {
        self.show_hit_zones = !self.show_hit_zones;
        self.show_hit_zones
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings unreadable: {}", e),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_override() {
        let mut settings = Settings::default();
        assert_eq!(settings.seed_or(123), 123);
        settings.seed = Some(7);
        assert_eq!(settings.seed_or(123), 7);
    }

    #[test]
    fn test_tuning_override_and_fallback() {
        let mut settings = Settings {
            tuning_json: Some(r#"{ "laps_per_opponent": 2 }"#.to_string()),
            ..Default::default()
        };
        assert_eq!(settings.tuning().laps_per_opponent, 2);

        settings.tuning_json = Some(r#"{ "track_width": -1.0 }"#.to_string());
        assert_eq!(settings.tuning(), crate::Tuning::default());
    }

    #[test]
    fn test_toggle_hit_zones_persists_in_json() {
        let mut settings = Settings::default();
        assert!(settings.toggle_hit_zones());

        let json = serde_json::to_string(&settings).unwrap();
        let restored: Settings = serde_json::from_str(&json).unwrap();
        assert!(restored.show_hit_zones);

        assert!(!settings.toggle_hit_zones());
        assert!(!settings.show_hit_zones);
    }

    #[test]
    fn test_partial_settings_json() {
        let settings: Settings = serde_json::from_str(r#"{ "show_hit_zones": true }"#).unwrap();
        assert!(settings.show_hit_zones);
        assert!(settings.line_markings);
    }
}
