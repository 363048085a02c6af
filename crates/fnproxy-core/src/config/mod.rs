//! Configuration files read by fnproxy
//!
//! - `providers.toml`: per-provider credential tables
//! - shared TOML parsing with line-context error messages

pub mod credentials;
pub mod parser;

pub use credentials::{Credential, CredentialConfig, CredentialError, ProviderCredentials};
pub use parser::{TomlError, from_toml_str, to_toml};
