//! Module-specific deployment jobs.
//!
//! A job carries the validated, run-wide settings for one module. For each
//! target it builds that target's options and turns a provider result into
//! the module's record shape.

use async_trait::async_trait;
use chrono::Utc;

use crate::provider::{HttpProxyOpts, Provider, ReverseProxyOpts, SocksProxyOpts};
use crate::records::{
    HttpRecord, HttpRecords, ReverseHistory, ReverseRecord, SocksRecord, SocksRecords,
};
use crate::types::Module;

use super::reconcile::{Decision, Reconciler};

pub const HTTP_FUNCTION_NAME: &str = "http_proxy";
pub const HTTP_TRIGGER_NAME: &str = "http_trigger";
pub const SOCKS_FUNCTION_NAME: &str = "socks_proxy";
pub const SOCKS_TRIGGER_NAME: &str = "socks_trigger";

#[async_trait]
pub trait ModuleJob: Send + Sync + 'static {
    /// Per-target deployment options, owned by that target's task
    type Options: Send + Sync + 'static;
    type Record: Send + 'static;
    type Records: Reconciler<Record = Self::Record> + Send;

    fn module(&self) -> Module;

    fn options(&self, decision: Decision) -> Self::Options;

    async fn deploy(
        &self,
        target: &dyn Provider,
        options: &Self::Options,
    ) -> anyhow::Result<Self::Record>;
}

fn unsupported(target: &dyn Provider, module: Module) -> anyhow::Error {
    anyhow::anyhow!("Provider {} can't deploy {}", target.name(), module)
}

/// A validated deploy request, ready to dispatch.
#[derive(Debug, Clone)]
pub enum ModulePlan {
    Http(HttpJob),
    Socks(SocksJob),
    Reverse(ReverseJob),
}

impl ModulePlan {
    pub fn module(&self) -> Module {
        match self {
            ModulePlan::Http(job) => job.module(),
            ModulePlan::Socks(job) => job.module(),
            ModulePlan::Reverse(job) => job.module(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpJob {
    pub function_name: String,
    pub trigger_name: String,
}

impl Default for HttpJob {
    fn default() -> Self {
        Self {
            function_name: HTTP_FUNCTION_NAME.to_string(),
            trigger_name: HTTP_TRIGGER_NAME.to_string(),
        }
    }
}

#[async_trait]
impl ModuleJob for HttpJob {
    type Options = HttpProxyOpts;
    type Record = HttpRecord;
    type Records = HttpRecords;

    fn module(&self) -> Module {
        Module::Http
    }

    fn options(&self, decision: Decision) -> HttpProxyOpts {
        HttpProxyOpts {
            function_name: self.function_name.clone(),
            trigger_name: self.trigger_name.clone(),
            resume_trigger: decision.resume_trigger(),
        }
    }

    async fn deploy(
        &self,
        target: &dyn Provider,
        options: &HttpProxyOpts,
    ) -> anyhow::Result<HttpRecord> {
        let provider = target
            .as_http()
            .ok_or_else(|| unsupported(target, Module::Http))?;
        let deployment = provider.deploy_http_proxy(options).await?;
        Ok(HttpRecord {
            api: deployment.api,
            deployed_at: Some(Utc::now()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SocksJob {
    pub function_name: String,
    pub trigger_name: String,
    pub key: String,
    /// Callback address exactly as given
    pub addr: String,
    /// Resolved callback host, stored in the record
    pub host: String,
    pub port: u16,
    pub auth: Option<String>,
}

impl SocksJob {
    pub fn new(key: String, addr: String, host: String, port: u16, auth: Option<String>) -> Self {
        Self {
            function_name: SOCKS_FUNCTION_NAME.to_string(),
            trigger_name: SOCKS_TRIGGER_NAME.to_string(),
            key,
            addr,
            host,
            port,
            auth,
        }
    }
}

#[async_trait]
impl ModuleJob for SocksJob {
    type Options = SocksProxyOpts;
    type Record = SocksRecord;
    type Records = SocksRecords;

    fn module(&self) -> Module {
        Module::Socks
    }

    fn options(&self, decision: Decision) -> SocksProxyOpts {
        SocksProxyOpts {
            function_name: self.function_name.clone(),
            trigger_name: self.trigger_name.clone(),
            resume_trigger: decision.resume_trigger(),
            key: self.key.clone(),
            addr: self.addr.clone(),
            auth: self.auth.clone(),
        }
    }

    async fn deploy(
        &self,
        target: &dyn Provider,
        options: &SocksProxyOpts,
    ) -> anyhow::Result<SocksRecord> {
        let provider = target
            .as_socks()
            .ok_or_else(|| unsupported(target, Module::Socks))?;
        provider.deploy_socks_proxy(options).await?;
        Ok(SocksRecord {
            key: options.key.clone(),
            host: self.host.clone(),
            port: self.port,
            deployed_at: Some(Utc::now()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReverseJob {
    pub origin: String,
    /// Scheme of `origin`, reused for the public URL
    pub scheme: String,
    pub ips: Vec<String>,
}

#[async_trait]
impl ModuleJob for ReverseJob {
    type Options = ReverseProxyOpts;
    type Record = ReverseRecord;
    type Records = ReverseHistory;

    fn module(&self) -> Module {
        Module::Reverse
    }

    fn options(&self, _decision: Decision) -> ReverseProxyOpts {
        ReverseProxyOpts {
            origin: self.origin.clone(),
            ips: self.ips.clone(),
        }
    }

    async fn deploy(
        &self,
        target: &dyn Provider,
        options: &ReverseProxyOpts,
    ) -> anyhow::Result<ReverseRecord> {
        let provider = target
            .as_reverse()
            .ok_or_else(|| unsupported(target, Module::Reverse))?;
        let deployment = provider.deploy_reverse_proxy(options).await?;

        let api = format!("{}://{}", self.scheme, deployment.service_domain);
        let allowed = if deployment.plugin_id.is_empty() {
            "all".to_string()
        } else {
            options.ips.join(", ")
        };
        tracing::info!(
            "{}.{}: {} - {} : accessible from {}",
            deployment.provider,
            deployment.region,
            deployment.origin,
            api,
            allowed
        );

        Ok(ReverseRecord {
            provider: deployment.provider,
            region: deployment.region,
            api_id: deployment.api_id,
            api,
            origin: deployment.origin,
            service_id: deployment.service_id,
            plugin_id: deployment.plugin_id,
            ips: options.ips.clone(),
            deployed_at: Some(Utc::now()),
        })
    }
}
