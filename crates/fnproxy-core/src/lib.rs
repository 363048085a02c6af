//! fnproxy Core Library
//!
//! Deploys HTTP, SOCKS and reverse proxies onto cloud function compute across
//! multiple providers and regions, and keeps a local record of what is live so
//! repeated runs only redo the work that has not succeeded yet.

pub mod commands;
pub mod config;
pub mod context;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod provider;
pub mod records;
pub mod region;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Deployment
    pub use crate::deploy::{
        Decision, DeployReport, DeployRequest, DeployService, DispatchReport, ModuleRequest,
        TargetOutcome, TargetStatus,
    };

    // Providers
    pub use crate::provider::{
        HttpDeployment, HttpProxyOpts, HttpProxyProvider, Provider, ProviderCatalog,
        ProviderFactory, ProviderRegistry, ReverseDeployment, ReverseProxyOpts,
        ReverseProxyProvider, SocksProxyOpts, SocksProxyProvider, Target,
    };

    // Records
    pub use crate::records::{
        HttpRecord, HttpRecords, RecordStore, ReverseHistory, ReverseRecord, SocksRecord,
        SocksRecords, TomlRecordStore,
    };

    // Configuration
    pub use crate::config::{Credential, CredentialConfig, ProviderCredentials};
    pub use crate::context::AppContext;

    pub use crate::diagnostics::{Diagnostic, Severity};
    pub use crate::error::DeployError;
    pub use crate::types::{Capabilities, Module};
}
