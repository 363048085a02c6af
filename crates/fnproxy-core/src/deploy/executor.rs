//! Dispatch one module's deployment across targets in parallel.
//!
//! Every eligible target gets its own task and all tasks start at once. Tasks
//! never touch the record set: each returns its result, and the dispatcher
//! folds results into the records it owns as they complete.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::{JoinHandle, JoinSet};

use crate::diagnostics::Diagnostic;
use crate::provider::Target;
use crate::types::Module;

use super::jobs::ModuleJob;
use super::reconcile::{Decision, Reconciler};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    /// Already live, provider not contacted
    Skipped,
    Deployed {
        /// Only the trigger was created
        resumed: bool,
    },
    Failed {
        error: String,
    },
    /// Provider lacks the module capability
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    pub provider: String,
    pub region: String,
    #[serde(flatten)]
    pub status: TargetStatus,
}

impl TargetOutcome {
    fn new(provider: String, region: String, status: TargetStatus) -> Self {
        Self {
            provider,
            region,
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub module: Module,
    /// In completion order, skipped and unsupported targets first
    pub outcomes: Vec<TargetOutcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DispatchReport {
    fn new(module: Module) -> Self {
        Self {
            module,
            outcomes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn deployed(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Deployed { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Skipped))
    }

    pub fn unsupported(&self) -> usize {
        self.count(|s| matches!(s, TargetStatus::Unsupported))
    }

    pub fn outcome(&self, provider: &str, region: &str) -> Option<&TargetOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.provider == provider && o.region == region)
    }

    fn count(&self, pred: impl Fn(&TargetStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

struct TaskOutcome<R> {
    provider: String,
    region: String,
    resumed: bool,
    result: anyhow::Result<R>,
}

/// Deploy `job` to every target that supports its module.
///
/// Returns once every launched task has finished. `records` is only mutated
/// here, by successful results; `task_timeout` bounds each provider call.
pub async fn dispatch<J: ModuleJob>(
    targets: &[Target],
    job: Arc<J>,
    records: &mut J::Records,
    task_timeout: Option<Duration>,
) -> DispatchReport {
    let module = job.module();
    let mut report = DispatchReport::new(module);
    let mut tasks = JoinSet::new();

    for target in targets {
        let provider = target.name().to_string();
        let region = target.region().to_string();

        if !target.capabilities().supports(module) {
            report.diagnostics.push(Diagnostic::error(format!(
                "Provider {} can't deploy {}",
                provider, module
            )));
            report
                .outcomes
                .push(TargetOutcome::new(provider, region, TargetStatus::Unsupported));
            continue;
        }

        let decision = records.decide(&provider, &region);
        match decision {
            Decision::Skip => {
                tracing::info!("{} {} has already been deployed, pass", provider, region);
                report
                    .outcomes
                    .push(TargetOutcome::new(provider, region, TargetStatus::Skipped));
                continue;
            }
            Decision::Resume => {
                tracing::info!(
                    "{} {} function exists, only creating the trigger",
                    provider,
                    region
                );
            }
            Decision::Fresh => {}
        }

        let options = job.options(decision);
        let job = Arc::clone(&job);
        let target = Arc::clone(target);
        tasks.spawn(async move {
            let deployment =
                tokio::spawn(async move { job.deploy(target.as_ref(), &options).await });
            TaskOutcome {
                provider,
                region,
                resumed: decision.resume_trigger(),
                result: supervise(deployment, task_timeout).await,
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let TaskOutcome {
            provider,
            region,
            resumed,
            result,
        } = match joined {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Deployment task aborted: {}", err);
                continue;
            }
        };

        let status = match result {
            Ok(record) => {
                tracing::info!("[success] {} proxy deployed in {}.{}", module, provider, region);
                records.fold(&provider, &region, record);
                TargetStatus::Deployed { resumed }
            }
            Err(err) => {
                tracing::error!("{}.{}: {:#}", provider, region, err);
                TargetStatus::Failed {
                    error: format!("{:#}", err),
                }
            }
        };
        report
            .outcomes
            .push(TargetOutcome::new(provider, region, status));
    }

    report
}

/// Await a deployment task, turning panics and timeouts into errors.
async fn supervise<R: Send + 'static>(
    mut handle: JoinHandle<anyhow::Result<R>>,
    limit: Option<Duration>,
) -> anyhow::Result<R> {
    let joined = match limit {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                anyhow::bail!("deployment timed out after {}s", limit.as_secs_f64());
            }
        },
        None => handle.await,
    };
    joined.map_err(|e| anyhow::anyhow!("deployment task failed: {}", e))?
}
