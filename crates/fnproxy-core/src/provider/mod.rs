//! Provider abstraction for cross-cloud deployment
//!
//! A provider is one cloud vendor bound to one region. Each concrete provider
//! declares which deployment capabilities it implements:
//! - [`HttpProxyProvider`]: function + API gateway trigger serving HTTP
//! - [`SocksProxyProvider`]: function + timer trigger dialing back to a SOCKS server
//! - [`ReverseProxyProvider`]: API gateway service mapped onto an origin
//!
//! The dispatcher only ever talks to these traits; vendor SDKs plug in through
//! [`ProviderFactory`].

pub mod catalog;
pub mod registry;

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::Capabilities;

pub use registry::{ProviderCatalog, ProviderFactory, ProviderRegistry};

/// A constructed, credential-backed (provider, region) pair.
pub type Target = Arc<dyn Provider>;

/// Trait implemented by every region-scoped provider.
pub trait Provider: Send + Sync {
    /// Provider identifier, e.g. `tencent`
    fn name(&self) -> &str;

    /// Region this instance deploys into
    fn region(&self) -> &str;

    fn as_http(&self) -> Option<&dyn HttpProxyProvider> {
        None
    }

    fn as_socks(&self) -> Option<&dyn SocksProxyProvider> {
        None
    }

    fn as_reverse(&self) -> Option<&dyn ReverseProxyProvider> {
        None
    }

    /// Capability set derived from the `as_*` accessors.
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            http: self.as_http().is_some(),
            socks: self.as_socks().is_some(),
            reverse: self.as_reverse().is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProxyOpts {
    pub function_name: String,
    pub trigger_name: String,
    /// Reuse the existing function and only create the trigger
    pub resume_trigger: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpDeployment {
    pub provider: String,
    pub region: String,
    /// Public endpoint; empty when the trigger did not yield one
    pub api: String,
}

#[async_trait]
pub trait HttpProxyProvider: Send + Sync {
    async fn deploy_http_proxy(&self, opts: &HttpProxyOpts) -> anyhow::Result<HttpDeployment>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocksProxyOpts {
    pub function_name: String,
    pub trigger_name: String,
    pub resume_trigger: bool,
    /// Verification key the function presents when dialing back
    pub key: String,
    /// `host:port` the function connects back to
    pub addr: String,
    /// Optional `username:password` for SOCKS authentication
    pub auth: Option<String>,
}

#[async_trait]
pub trait SocksProxyProvider: Send + Sync {
    async fn deploy_socks_proxy(&self, opts: &SocksProxyOpts) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseProxyOpts {
    pub origin: String,
    /// Source IPs allowed to reach the public endpoint; empty means everyone
    pub ips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseDeployment {
    pub provider: String,
    pub region: String,
    pub api_id: String,
    pub service_id: String,
    /// IP restriction plugin; empty when no allow-list was applied
    pub plugin_id: String,
    pub service_domain: String,
    pub origin: String,
}

#[async_trait]
pub trait ReverseProxyProvider: Send + Sync {
    async fn deploy_reverse_proxy(
        &self,
        opts: &ReverseProxyOpts,
    ) -> anyhow::Result<ReverseDeployment>;
}
