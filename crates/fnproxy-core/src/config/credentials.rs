//! Provider credential file.
//!
//! One TOML table per provider; the field names are whatever that provider's
//! backend expects:
//!
//! ```toml
//! [tencent]
//! secret_id = "AKID..."
//! secret_key = "..."
//!
//! [alibaba]
//! account_id = "..."
//! access_key_id = "..."
//! access_key_secret = "..."
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::parser::{TomlError, from_toml_str};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read credential file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credential file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: TomlError,
    },
}

/// Key/value credential fields for a single provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential {
    fields: BTreeMap<String, String>,
}

impl Credential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// At least one field is present and none is blank.
    pub fn is_complete(&self) -> bool {
        !self.fields.is_empty() && self.fields.values().all(|v| !v.trim().is_empty())
    }
}

/// Abstract view of which providers have usable credentials.
pub trait CredentialConfig: Send + Sync {
    fn credentials(&self, provider: &str) -> Option<&Credential>;

    fn is_configured(&self, provider: &str) -> bool {
        self.credentials(provider).is_some_and(Credential::is_complete)
    }
}

/// Credentials for every provider, as stored in `providers.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderCredentials {
    providers: BTreeMap<String, Credential>,
}

impl ProviderCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file means nothing is configured.
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        if !path.exists() {
            tracing::debug!("Credential file {} not found", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| CredentialError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| CredentialError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, TomlError> {
        from_toml_str(content)
    }

    pub fn insert(&mut self, provider: impl Into<String>, credential: Credential) {
        self.providers.insert(provider.into(), credential);
    }

    /// Provider ids that have a table in the file, configured or not.
    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

impl CredentialConfig for ProviderCredentials {
    fn credentials(&self, provider: &str) -> Option<&Credential> {
        self.providers.get(provider)
    }
}
