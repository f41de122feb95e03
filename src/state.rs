//! Application State
//!
//! Process-wide state built once at startup: the configuration and the single
//! record store that every command and service receives explicitly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::storage::{ConfigService, Database, FileIdentitySlot, RecordStore};
use crate::utils::error::AppResult;

pub struct AppState {
    /// Configuration service for app settings
    config: ConfigService,
    /// The shared record store
    store: Arc<dyn RecordStore>,
    /// Where per-instance identity slots are kept
    identity_dir: PathBuf,
}

impl AppState {
    /// Build the state from the default locations, or from overrides.
    ///
    /// With a config override, identity slots live next to that config file.
    /// The database is not opened here; the store opens itself on first use.
    pub fn initialize(
        config_override: Option<PathBuf>,
        database_override: Option<PathBuf>,
    ) -> AppResult<Self> {
        Self::from_config(Self::load_config(config_override)?, database_override)
    }

    /// Load the configuration alone, so logging can be set up from it before
    /// the rest of the state is built.
    pub fn load_config(config_override: Option<PathBuf>) -> AppResult<ConfigService> {
        match config_override {
            Some(path) => ConfigService::at_path(path),
            None => ConfigService::new(),
        }
    }

    /// Finish building the state from a loaded configuration
    pub fn from_config(
        config: ConfigService,
        database_override: Option<PathBuf>,
    ) -> AppResult<Self> {
        let identity_dir = match config.config_path().parent() {
            Some(dir) => dir.join("instances"),
            None => crate::utils::paths::identity_dir()?,
        };

        let database_path = match database_override {
            Some(path) => path,
            None => config.resolved_database_path()?,
        };
        info!(database = %database_path.display(), "Application state initialized");

        Ok(Self {
            config,
            store: Arc::new(Database::new(database_path)),
            identity_dir,
        })
    }

    /// Build the state around an existing store
    pub fn with_store(
        config: ConfigService,
        store: Arc<dyn RecordStore>,
        identity_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            store,
            identity_dir: identity_dir.into(),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// A shared handle to the store, for long-lived owners such as applets
    pub fn shared_store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    pub fn get_config(&self) -> &AppConfig {
        self.config.get_config()
    }

    /// Apply and persist a partial settings update
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        self.config.update_config(update)
    }

    /// Restore and persist the default settings
    pub fn reset_config(&mut self) -> AppResult<AppConfig> {
        self.config.reset()
    }

    pub fn identity_dir(&self) -> &Path {
        &self.identity_dir
    }

    /// Identity slot for a named widget instance
    pub fn identity_slot(&self, instance: &str) -> AppResult<FileIdentitySlot> {
        FileIdentitySlot::for_instance_in(&self.identity_dir, instance)
    }

    /// Check if database is healthy
    pub fn is_database_healthy(&self) -> bool {
        self.store.is_healthy()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("identity_dir", &self.identity_dir)
            .finish()
    }
}
