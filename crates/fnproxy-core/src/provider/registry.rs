//! Provider registry for region listings and target construction.
//!
//! The registry is the authoritative source of which providers exist and
//! which regions each one offers. It is passed in explicitly so tests can
//! substitute a fixed listing.

use std::fmt;

use crate::config::Credential;

use super::{Target, catalog};

/// Collaborator that knows providers, their regions, and how to build targets.
pub trait ProviderRegistry: Send + Sync {
    /// All known provider ids.
    fn providers(&self) -> Vec<String>;

    /// Regions for `provider` in native listing order, or `None` if unknown.
    fn list_regions(&self, provider: &str) -> Option<Vec<String>>;

    /// Construct a target for one (provider, region) pair.
    fn create_provider(
        &self,
        provider: &str,
        region: &str,
        credentials: &Credential,
    ) -> anyhow::Result<Target>;
}

/// Builds region-scoped targets for a single provider.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, region: &str, credentials: &Credential) -> anyhow::Result<Target>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&str, &Credential) -> anyhow::Result<Target> + Send + Sync,
{
    fn create(&self, region: &str, credentials: &Credential) -> anyhow::Result<Target> {
        self(region, credentials)
    }
}

struct CatalogEntry {
    id: String,
    regions: Vec<String>,
    factory: Option<Box<dyn ProviderFactory>>,
}

/// Registry of providers with static region listings and pluggable backends.
pub struct ProviderCatalog {
    entries: Vec<CatalogEntry>,
}

impl fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.id, e.factory.is_some())))
            .finish()
    }
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::with_builtin_providers()
    }
}

impl ProviderCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a catalog listing every built-in provider, without backends.
    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        for (id, regions) in catalog::builtin_providers() {
            registry.register_provider(id, regions.iter().map(|r| r.to_string()).collect());
        }
        registry
    }

    /// Register a provider and its regions, replacing any previous listing.
    pub fn register_provider(&mut self, id: impl Into<String>, regions: Vec<String>) {
        let id = id.into();
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.regions = regions,
            None => self.entries.push(CatalogEntry {
                id,
                regions,
                factory: None,
            }),
        }
    }

    /// Attach the backend used to construct targets for `id`.
    pub fn register_factory(
        &mut self,
        id: &str,
        factory: impl ProviderFactory + 'static,
    ) -> anyhow::Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| anyhow::anyhow!("{} is not a registered provider", id))?;
        entry.factory = Some(Box::new(factory));
        Ok(())
    }

    /// Whether a backend is attached for `id`.
    pub fn has_backend(&self, id: &str) -> bool {
        self.entry(id).is_some_and(|e| e.factory.is_some())
    }

    fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

impl ProviderRegistry for ProviderCatalog {
    fn providers(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    fn list_regions(&self, provider: &str) -> Option<Vec<String>> {
        self.entry(provider).map(|e| e.regions.clone())
    }

    fn create_provider(
        &self,
        provider: &str,
        region: &str,
        credentials: &Credential,
    ) -> anyhow::Result<Target> {
        let entry = self
            .entry(provider)
            .ok_or_else(|| anyhow::anyhow!("{} is not a valid provider", provider))?;
        if !entry.regions.iter().any(|r| r == region) {
            anyhow::bail!("{} doesn't have region {}", provider, region);
        }
        let factory = entry.factory.as_ref().ok_or_else(|| {
            anyhow::anyhow!("No deployment backend available for provider {}", provider)
        })?;
        factory.create(region, credentials)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::provider::Provider;

    struct Bare {
        region: String,
    }

    impl Provider for Bare {
        fn name(&self) -> &str {
            "custom"
        }

        fn region(&self) -> &str {
            &self.region
        }
    }

    #[test]
    fn test_builtin_providers_registered() {
        let catalog = ProviderCatalog::with_builtin_providers();
        let ids = catalog.providers();

        assert_eq!(ids, vec!["alibaba", "tencent", "huawei", "aws"]);
        for id in &ids {
            let regions = catalog.list_regions(id).expect("builtin provider has regions");
            assert!(!regions.is_empty());
        }
    }

    #[test]
    fn test_list_regions_unknown_provider() {
        let catalog = ProviderCatalog::with_builtin_providers();
        assert!(catalog.list_regions("nonexistent").is_none());
    }

    #[test]
    fn test_register_provider_replaces_listing() {
        let mut catalog = ProviderCatalog::new();
        catalog.register_provider("custom", vec!["a-1".to_string()]);
        catalog.register_provider("custom", vec!["b-1".to_string(), "b-2".to_string()]);

        assert_eq!(catalog.providers().len(), 1);
        assert_eq!(
            catalog.list_regions("custom"),
            Some(vec!["b-1".to_string(), "b-2".to_string()])
        );
    }

    #[test]
    fn test_create_without_backend_fails() {
        let catalog = ProviderCatalog::with_builtin_providers();
        let err = catalog
            .create_provider("tencent", "ap-guangzhou", &Credential::default())
            .err()
            .expect("no backend registered");
        assert!(err.to_string().contains("No deployment backend"));
    }

    #[test]
    fn test_create_with_factory() {
        let mut catalog = ProviderCatalog::new();
        catalog.register_provider("custom", vec!["a-1".to_string()]);
        catalog
            .register_factory("custom", |region: &str, _: &Credential| -> anyhow::Result<Target> {
                Ok(Arc::new(Bare {
                    region: region.to_string(),
                }) as Target)
            })
            .unwrap();

        assert!(catalog.has_backend("custom"));
        let target = catalog
            .create_provider("custom", "a-1", &Credential::default())
            .unwrap();
        assert_eq!(target.name(), "custom");
        assert_eq!(target.region(), "a-1");

        assert!(
            catalog
                .create_provider("custom", "z-9", &Credential::default())
                .is_err()
        );
    }

    #[test]
    fn test_register_factory_unknown_provider() {
        let mut catalog = ProviderCatalog::new();
        let result =
            catalog.register_factory("ghost", |_: &str, _: &Credential| -> anyhow::Result<Target> {
                anyhow::bail!("unreachable")
            });
        assert!(result.is_err());
    }
}
