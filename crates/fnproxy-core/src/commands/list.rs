//! List command: provider regions and deployed records.

use anyhow::Context;
use serde::Serialize;

use crate::context::AppContext;
use crate::provider::{ProviderCatalog, ProviderRegistry};
use crate::records::{HttpRecords, RecordStore, ReverseHistory, SocksRecords};
use crate::types::Module;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRegions {
    pub provider: String,
    pub regions: Vec<String>,
    /// Whether a deployment backend is registered
    pub backend: bool,
}

/// One deployed record, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub provider: String,
    pub region: String,
    /// Endpoint URL (http, reverse) or `host:port` (socks)
    pub endpoint: String,
    /// Extra module detail: socks key or reverse origin
    pub detail: String,
    pub live: bool,
}

pub struct ListCommand {
    context: AppContext,
    catalog: ProviderCatalog,
}

impl ListCommand {
    pub fn new(context: AppContext, catalog: ProviderCatalog) -> Self {
        Self { context, catalog }
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(
            AppContext::with_defaults()?,
            ProviderCatalog::default(),
        ))
    }

    /// Regions for `providers`, or for every known provider when empty.
    pub fn regions(&self, providers: &[String]) -> anyhow::Result<Vec<ProviderRegions>> {
        let ids = if providers.is_empty() {
            self.catalog.providers()
        } else {
            providers.to_vec()
        };

        ids.into_iter()
            .map(|provider| {
                let regions = self
                    .catalog
                    .list_regions(&provider)
                    .ok_or_else(|| anyhow::anyhow!("{} is not a valid provider", provider))?;
                Ok(ProviderRegions {
                    backend: self.catalog.has_backend(&provider),
                    provider,
                    regions,
                })
            })
            .collect()
    }

    /// Records persisted for `module`.
    pub fn records(&self, module: Module) -> anyhow::Result<Vec<RecordRow>> {
        let store = self.context.record_store(module);
        let path = store.path().display().to_string();

        let rows = match module {
            Module::Http => {
                let records = RecordStore::<HttpRecords>::load(&store)
                    .with_context(|| format!("Failed to load {}", path))?;
                records
                    .iter()
                    .map(|(provider, region, r)| RecordRow {
                        provider: provider.to_string(),
                        region: region.to_string(),
                        endpoint: r.api.clone(),
                        detail: String::new(),
                        live: !r.api.is_empty(),
                    })
                    .collect()
            }
            Module::Socks => {
                let records = RecordStore::<SocksRecords>::load(&store)
                    .with_context(|| format!("Failed to load {}", path))?;
                records
                    .iter()
                    .map(|(provider, region, r)| RecordRow {
                        provider: provider.to_string(),
                        region: region.to_string(),
                        endpoint: format!("{}:{}", r.host, r.port),
                        detail: r.key.clone(),
                        live: !r.key.is_empty(),
                    })
                    .collect()
            }
            Module::Reverse => {
                let history = RecordStore::<ReverseHistory>::load(&store)
                    .with_context(|| format!("Failed to load {}", path))?;
                history
                    .records()
                    .iter()
                    .map(|r| RecordRow {
                        provider: r.provider.clone(),
                        region: r.region.clone(),
                        endpoint: r.api.clone(),
                        detail: r.origin.clone(),
                        live: true,
                    })
                    .collect()
            }
        };

        Ok(rows)
    }
}
