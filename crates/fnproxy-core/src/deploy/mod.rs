//! Deploy coordination: target building, idempotency, and parallel dispatch.

pub mod executor;
pub mod jobs;
pub mod reconcile;
pub mod request;
pub mod service;
pub mod targeting;

pub use executor::{DispatchReport, TargetOutcome, TargetStatus, dispatch};
pub use jobs::{HttpJob, ModuleJob, ModulePlan, ReverseJob, SocksJob};
pub use reconcile::{Decision, Reconciler};
pub use request::{DeployRequest, ModuleRequest, RANDOM_KEY, SOCKS_KEY_LENGTH, generate_key};
pub use service::{DeployReport, DeployService, ModuleStores};
pub use targeting::{TargetBuilder, TargetSet};
