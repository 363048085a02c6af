//! Build deployment targets from requested providers and region patterns.

use crate::config::CredentialConfig;
use crate::diagnostics::Diagnostic;
use crate::provider::{ProviderRegistry, Target};
use crate::region::resolve_regions;

/// Targets ready for dispatch plus everything that was skipped.
#[derive(Default)]
pub struct TargetSet {
    pub targets: Vec<Target>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TargetSet {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// `(provider, region)` of every target, in build order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.targets
            .iter()
            .map(|t| (t.name().to_string(), t.region().to_string()))
            .collect()
    }
}

/// Turns provider ids and region patterns into concrete targets.
///
/// Never fails: unknown providers, missing credentials, unusable patterns and
/// construction errors are diagnosed and skipped.
pub struct TargetBuilder<'a> {
    registry: &'a dyn ProviderRegistry,
    credentials: &'a dyn CredentialConfig,
}

impl<'a> TargetBuilder<'a> {
    pub fn new(registry: &'a dyn ProviderRegistry, credentials: &'a dyn CredentialConfig) -> Self {
        Self {
            registry,
            credentials,
        }
    }

    pub fn build(&self, providers: &[String], patterns: &[String]) -> TargetSet {
        let mut set = TargetSet::default();
        let mut seen: Vec<&str> = Vec::new();

        for provider in providers {
            let provider = provider.as_str();
            if seen.contains(&provider) {
                continue;
            }
            seen.push(provider);

            let Some(listing) = self.registry.list_regions(provider) else {
                set.diagnostics.push(Diagnostic::error(format!(
                    "{} is not a valid provider",
                    provider
                )));
                continue;
            };

            let credentials = match self.credentials.credentials(provider) {
                Some(c) if self.credentials.is_configured(provider) => c,
                _ => {
                    set.diagnostics.push(Diagnostic::warning(format!(
                        "{}'s credential config not set, will ignore",
                        provider
                    )));
                    continue;
                }
            };

            let resolution = resolve_regions(provider, &listing, patterns);
            set.diagnostics.extend(resolution.diagnostics);
            if resolution.regions.is_empty() {
                set.diagnostics.push(Diagnostic::error(format!(
                    "No region available for {}, use the list command to see its regions",
                    provider
                )));
                continue;
            }

            for region in &resolution.regions {
                match self.registry.create_provider(provider, region, credentials) {
                    Ok(target) => set.targets.push(target),
                    Err(err) => set.diagnostics.push(Diagnostic::error(format!(
                        "Failed to create {} {}: {:#}",
                        provider, region, err
                    ))),
                }
            }
        }

        set
    }
}
