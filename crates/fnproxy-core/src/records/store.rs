//! Record store for loading and saving per-module record files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::parser::{TomlError, from_toml_str, to_toml};
use crate::types::Module;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read record file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse record file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: TomlError,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[source] TomlError),

    #[error("Failed to write record file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

/// Durable storage for one module's record set.
pub trait RecordStore<S>: Send + Sync {
    fn load(&self) -> Result<S, StoreError>;

    fn save(&self, records: &S) -> Result<(), StoreError>;
}

/// TOML file holding one module's records.
#[derive(Debug, Clone)]
pub struct TomlRecordStore {
    path: PathBuf,
}

impl TomlRecordStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<state_dir>/<module>.toml`
    pub fn for_module(state_dir: &Path, module: Module) -> Self {
        Self::new(state_dir.join(format!("{}.toml", module)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<S> RecordStore<S> for TomlRecordStore
where
    S: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> Result<S, StoreError> {
        if !self.path.exists() {
            return Ok(S::default());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        from_toml_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, records: &S) -> Result<(), StoreError> {
        let content = to_toml(records).map_err(StoreError::Serialize)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Saved records to {}", self.path.display());
        Ok(())
    }
}
