//! JSON settings file.
//!
//! The profile is stored as a versioned envelope. A missing file, a
//! version mismatch, or an unreadable document all collapse to a full
//! factory reset, mirroring how the original hardware treated a stale
//! NVRAM image. Saves go through a temp file and rename so a crash never
//! leaves a half-written profile.

use retromodem_core::{SessionConfig, SettingsError, SettingsStore, SETTINGS_VERSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
struct StoredProfile {
    version: u32,
    profile: SessionConfig,
}

/// File-backed settings store.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        JsonSettingsStore { path }
    }

    fn write_profile(&self, config: &SessionConfig) -> Result<(), SettingsError> {
        let envelope = StoredProfile {
            version: SETTINGS_VERSION,
            profile: config.clone(),
        };
        let body = serde_json::to_vec_pretty(&envelope)
            .map_err(|err| SettingsError::Corrupt(err.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&mut self) -> Result<SessionConfig, SettingsError> {
        let body = match fs::read(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no settings file, writing factory defaults");
                return self.reset_to_factory();
            }
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice::<StoredProfile>(&body) {
            Ok(stored) if stored.version == SETTINGS_VERSION => Ok(stored.profile),
            Ok(stored) => {
                tracing::warn!(
                    "settings version {} does not match {}, resetting to factory defaults",
                    stored.version,
                    SETTINGS_VERSION
                );
                self.reset_to_factory()
            }
            Err(err) => {
                tracing::warn!("settings file unreadable ({err}), resetting to factory defaults");
                self.reset_to_factory()
            }
        }
    }

    fn save(&mut self, config: &SessionConfig) -> Result<(), SettingsError> {
        self.write_profile(config)
    }

    fn reset_to_factory(&mut self) -> Result<SessionConfig, SettingsError> {
        let defaults = SessionConfig::factory_defaults();
        self.write_profile(&defaults)?;
        Ok(defaults)
    }
}
