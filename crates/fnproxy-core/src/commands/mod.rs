//! High-level commands for fnproxy operations.
//!
//! Synchronous entry points for frontends. Each command builds whatever
//! runtime it needs and returns a report for the frontend to render.

pub mod deploy;
pub mod list;

pub use deploy::DeployCommand;
pub use list::{ListCommand, ProviderRegions, RecordRow};
