//! Shared core types used across the provider, record and deploy layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Proxy kinds that can be deployed onto a cloud function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    /// HTTP forward proxy fronted by an API gateway trigger.
    Http,
    /// Reverse-connecting SOCKS proxy.
    Socks,
    /// Reverse proxy in front of an origin.
    Reverse,
}

impl Module {
    pub const ALL: [Module; 3] = [Module::Http, Module::Socks, Module::Reverse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Http => "http",
            Module::Socks => "socks",
            Module::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Module::Http),
            "socks" => Ok(Module::Socks),
            "reverse" => Ok(Module::Reverse),
            _ => anyhow::bail!("Unknown module: {}. Use 'http', 'socks', or 'reverse'", s),
        }
    }
}

/// Which modules a provider implementation is able to deploy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub http: bool,
    #[serde(default)]
    pub socks: bool,
    #[serde(default)]
    pub reverse: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            http: true,
            socks: true,
            reverse: true,
        }
    }

    pub fn supports(&self, module: Module) -> bool {
        match module {
            Module::Http => self.http,
            Module::Socks => self.socks,
            Module::Reverse => self.reverse,
        }
    }

    /// Modules in this set, in declaration order.
    pub fn modules(&self) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|m| self.supports(*m))
            .collect()
    }
}
