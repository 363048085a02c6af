//! Deploy service: validate, build targets, load, dispatch, save.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::CredentialConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{DeployError, DeployResult};
use crate::provider::{ProviderRegistry, Target};
use crate::records::{HttpRecords, RecordStore, ReverseHistory, SocksRecords, TomlRecordStore};
use crate::types::Module;

use super::executor::{DispatchReport, dispatch};
use super::jobs::{ModuleJob, ModulePlan};
use super::request::DeployRequest;
use super::targeting::TargetBuilder;

/// One record store per module.
pub struct ModuleStores {
    pub http: Box<dyn RecordStore<HttpRecords>>,
    pub socks: Box<dyn RecordStore<SocksRecords>>,
    pub reverse: Box<dyn RecordStore<ReverseHistory>>,
}

impl ModuleStores {
    /// TOML files under `state_dir`, one per module.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self {
            http: Box::new(TomlRecordStore::for_module(state_dir, Module::Http)),
            socks: Box::new(TomlRecordStore::for_module(state_dir, Module::Socks)),
            reverse: Box::new(TomlRecordStore::for_module(state_dir, Module::Reverse)),
        }
    }

    pub fn with_http(mut self, store: impl RecordStore<HttpRecords> + 'static) -> Self {
        self.http = Box::new(store);
        self
    }

    pub fn with_socks(mut self, store: impl RecordStore<SocksRecords> + 'static) -> Self {
        self.socks = Box::new(store);
        self
    }

    pub fn with_reverse(mut self, store: impl RecordStore<ReverseHistory> + 'static) -> Self {
        self.reverse = Box::new(store);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub module: Module,
    /// Number of targets built before capability filtering
    pub targets: usize,
    /// Findings from target building
    pub diagnostics: Vec<Diagnostic>,
    pub dispatch: DispatchReport,
}

/// Runs deploy requests against an injected registry and credential config.
pub struct DeployService<'a> {
    registry: &'a dyn ProviderRegistry,
    credentials: &'a dyn CredentialConfig,
}

impl<'a> DeployService<'a> {
    pub fn new(registry: &'a dyn ProviderRegistry, credentials: &'a dyn CredentialConfig) -> Self {
        Self {
            registry,
            credentials,
        }
    }

    /// Deploy the requested module.
    ///
    /// Fails only on invalid module options, a record load failure (before
    /// any target is contacted) or a save failure (after every task joined).
    pub async fn deploy(
        &self,
        request: &DeployRequest,
        stores: &ModuleStores,
    ) -> DeployResult<DeployReport> {
        let plan = request.validate().await?;

        let built = TargetBuilder::new(self.registry, self.credentials)
            .build(&request.providers, &request.regions);
        if built.is_empty() {
            tracing::warn!("No deployable target for {}", plan.module());
        }

        let timeout = request.task_timeout;
        let dispatch = match plan {
            ModulePlan::Http(job) => run(job, &built.targets, stores.http.as_ref(), timeout).await?,
            ModulePlan::Socks(job) => {
                run(job, &built.targets, stores.socks.as_ref(), timeout).await?
            }
            ModulePlan::Reverse(job) => {
                run(job, &built.targets, stores.reverse.as_ref(), timeout).await?
            }
        };

        Ok(DeployReport {
            module: dispatch.module,
            targets: built.targets.len(),
            diagnostics: built.diagnostics,
            dispatch,
        })
    }
}

async fn run<J: ModuleJob>(
    job: J,
    targets: &[Target],
    store: &dyn RecordStore<J::Records>,
    timeout: Option<Duration>,
) -> DeployResult<DispatchReport> {
    let module = job.module();
    let mut records = store
        .load()
        .map_err(|source| DeployError::LoadRecords { module, source })?;

    let report = dispatch(targets, Arc::new(job), &mut records, timeout).await;

    store
        .save(&records)
        .map_err(|source| DeployError::SaveRecords { module, source })?;
    Ok(report)
}
