//! Engine settings persistence
//!
//! `EngineSettings` lives in floatwin-types so embedders can build it without
//! the engine. Loading, saving and validation live here.

use std::path::Path;

use floatwin_types::EngineSettings;
use tracing::{debug, warn};

use crate::error::ConfigError;

const APP_NAME: &str = "floatwin";
const CONFIG_NAME: &str = "engine";

/// Extension trait for EngineSettings persistence
pub trait EngineSettingsExt: Sized {
    /// Load from the per-user config store, falling back to defaults
    fn load() -> Self;
    /// Load from an explicit TOML file. Missing keys take their defaults.
    fn load_from_path(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
}

impl EngineSettingsExt for EngineSettings {
    fn load() -> Self {
        match confy::load::<EngineSettings>(APP_NAME, CONFIG_NAME) {
            Ok(settings) => match settings.validate() {
                Ok(()) => settings,
                Err(e) => {
                    warn!(error = %e, "stored settings are invalid, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: EngineSettings =
            toml::from_str(&raw).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded engine settings");
        Ok(settings)
    }

    fn save(&self) -> Result<(), ConfigError> {
        self.validate()?;
        confy::store(APP_NAME, CONFIG_NAME, self)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("snap_interval_ms", self.snap_interval_ms),
            ("close_target_size", self.close_target_size as u64),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        if self.close_target_hysteresis.is_nan() || self.close_target_hysteresis < 1.0 {
            return Err(ConfigError::Invalid(
                "close_target_hysteresis must be at least 1.0".to_string(),
            ));
        }
        if self.drag_debounce_sq_px.is_nan() || self.drag_debounce_sq_px < 0.0 {
            return Err(ConfigError::Invalid(
                "drag_debounce_sq_px must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
