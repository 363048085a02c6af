//! Deploy command implementation.
//!
//! Loads credentials, then runs the deploy service on a fresh tokio runtime
//! so frontends can stay synchronous.

use anyhow::Context;

use crate::context::AppContext;
use crate::deploy::{DeployReport, DeployRequest, DeployService};
use crate::provider::ProviderCatalog;

pub struct DeployCommand {
    context: AppContext,
    catalog: ProviderCatalog,
}

impl DeployCommand {
    pub fn new(context: AppContext, catalog: ProviderCatalog) -> Self {
        Self { context, catalog }
    }

    /// Default paths and the built-in provider catalog.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(
            AppContext::with_defaults()?,
            ProviderCatalog::default(),
        ))
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Catalog access for registering provider backends.
    pub fn catalog_mut(&mut self) -> &mut ProviderCatalog {
        &mut self.catalog
    }

    pub fn execute(&self, request: &DeployRequest) -> anyhow::Result<DeployReport> {
        let credentials = self.context.credentials()?;
        let stores = self.context.module_stores();
        let service = DeployService::new(&self.catalog, &credentials);

        // Block on async dispatch using tokio runtime
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

        let report = runtime
            .block_on(service.deploy(request, &stores))
            .with_context(|| format!("Failed to deploy {} proxies", request.module()))?;
        Ok(report)
    }
}
