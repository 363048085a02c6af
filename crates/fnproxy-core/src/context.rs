//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::config::{CredentialError, ProviderCredentials};
use crate::deploy::ModuleStores;
use crate::records::TomlRecordStore;
use crate::types::Module;

/// File name of the credential file inside the config directory
pub const CREDENTIALS_FILE: &str = "providers.toml";

/// Unified application context for dependency injection.
///
/// Resolves where credentials and records live. Frontends create this once
/// and pass it to commands.
#[derive(Debug, Clone)]
pub struct AppContext {
    config_dir: PathBuf,
    credentials_path: PathBuf,
    state_dir: PathBuf,
}

impl AppContext {
    /// Create a new context rooted at `config_dir`.
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            credentials_path: config_dir.join(CREDENTIALS_FILE),
            state_dir: config_dir.join("records"),
            config_dir,
        }
    }

    /// Create a context under the platform config directory.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let config_dir = dirs::config_dir()
            .map(|p| p.join("fnproxy"))
            .or_else(|| dirs::home_dir().map(|h| h.join(".config").join("fnproxy")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(Self::new(config_dir))
    }

    /// Override the credential file path.
    pub fn with_credentials_path(mut self, path: PathBuf) -> Self {
        self.credentials_path = path;
        self
    }

    /// Override the directory holding record files.
    pub fn with_state_dir(mut self, dir: PathBuf) -> Self {
        self.state_dir = dir;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Load the credential file.
    pub fn credentials(&self) -> Result<ProviderCredentials, CredentialError> {
        ProviderCredentials::load(&self.credentials_path)
    }

    /// Get the record store for one module.
    pub fn record_store(&self, module: Module) -> TomlRecordStore {
        TomlRecordStore::for_module(&self.state_dir, module)
    }

    /// Get record stores for every module.
    pub fn module_stores(&self) -> ModuleStores {
        ModuleStores::in_dir(&self.state_dir)
    }
}
