//! Settings persistence boundary.
//!
//! Load, save and factory reset are atomic all-or-nothing operations keyed
//! by a version tag; a mismatching tag makes `load` fall back to factory
//! defaults. Byte layout is the store's business, not the core's.

use crate::config::SessionConfig;
use thiserror::Error;

/// Version tag for persisted profiles. Bump when `SessionConfig` changes
/// incompatibly; stores must treat a mismatch as "no stored profile".
pub const SETTINGS_VERSION: u32 = 1;

/// Errors from the settings collaborator.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying storage failed.
    #[error("settings storage I/O: {0}")]
    Io(#[from] std::io::Error),

    /// The stored profile could not be decoded.
    #[error("stored profile unreadable: {0}")]
    Corrupt(String),
}

/// The settings collaborator interface.
pub trait SettingsStore {
    /// Load the stored profile, or factory defaults when nothing valid is
    /// stored (missing, corrupt, or version mismatch).
    fn load(&mut self) -> Result<SessionConfig, SettingsError>;

    /// Persist the profile atomically.
    fn save(&mut self, config: &SessionConfig) -> Result<(), SettingsError>;

    /// Overwrite the store with factory defaults and return them.
    fn reset_to_factory(&mut self) -> Result<SessionConfig, SettingsError>;
}

/// In-memory store used by tests and by builds without persistent storage.
#[derive(Debug, Default)]
pub struct MemorySettings {
    stored: Option<SessionConfig>,
}

impl MemorySettings {
    pub fn new() -> Self {
        MemorySettings { stored: None }
    }

    /// Seed the store with a profile, as if previously saved.
    pub fn with_stored(config: SessionConfig) -> Self {
        MemorySettings {
            stored: Some(config),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn load(&mut self) -> Result<SessionConfig, SettingsError> {
        Ok(self
            .stored
            .clone()
            .unwrap_or_else(SessionConfig::factory_defaults))
    }

    fn save(&mut self, config: &SessionConfig) -> Result<(), SettingsError> {
        self.stored = Some(config.clone());
        Ok(())
    }

    fn reset_to_factory(&mut self) -> Result<SessionConfig, SettingsError> {
        let defaults = SessionConfig::factory_defaults();
        self.stored = Some(defaults.clone());
        Ok(defaults)
    }
}
