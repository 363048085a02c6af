//! Fake providers and in-memory record stores shared by integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use fnproxy_core::config::{Credential, ProviderCredentials};
use fnproxy_core::provider::{
    HttpDeployment, HttpProxyOpts, HttpProxyProvider, Provider, ProviderCatalog,
    ReverseDeployment, ReverseProxyOpts, ReverseProxyProvider, SocksProxyOpts,
    SocksProxyProvider, Target,
};
use fnproxy_core::records::{RecordStore, StoreError};
use fnproxy_core::types::Capabilities;

/// Options a fake provider was called with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOpts {
    Http(HttpProxyOpts),
    Socks(SocksProxyOpts),
    Reverse(ReverseProxyOpts),
}

/// Behaviour shared by every region of one fake provider.
pub struct FakeBackend {
    capabilities: Capabilities,
    failing: Vec<String>,
    hanging: Vec<String>,
    broken: Vec<String>,
    rendezvous: Option<Barrier>,
    calls: Mutex<Vec<(String, CallOpts)>>,
    deployed: AtomicUsize,
}

impl FakeBackend {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            failing: Vec::new(),
            hanging: Vec::new(),
            broken: Vec::new(),
            rendezvous: None,
            calls: Mutex::new(Vec::new()),
            deployed: AtomicUsize::new(0),
        }
    }

    pub fn all() -> Self {
        Self::new(Capabilities::all())
    }

    /// Deployments into these regions return an API error.
    pub fn failing(mut self, regions: &[&str]) -> Self {
        self.failing = regions.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Deployments into these regions never return.
    pub fn hanging(mut self, regions: &[&str]) -> Self {
        self.hanging = regions.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Target construction fails for these regions.
    pub fn broken(mut self, regions: &[&str]) -> Self {
        self.broken = regions.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Every call waits until `parties` calls are in flight at once.
    pub fn rendezvous(mut self, parties: usize) -> Self {
        self.rendezvous = Some(Barrier::new(parties));
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<(String, CallOpts)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn http_calls(&self) -> Vec<(String, HttpProxyOpts)> {
        self.calls()
            .into_iter()
            .filter_map(|(region, opts)| match opts {
                CallOpts::Http(opts) => Some((region, opts)),
                _ => None,
            })
            .collect()
    }

    pub fn socks_calls(&self) -> Vec<(String, SocksProxyOpts)> {
        self.calls()
            .into_iter()
            .filter_map(|(region, opts)| match opts {
                CallOpts::Socks(opts) => Some((region, opts)),
                _ => None,
            })
            .collect()
    }
}

pub struct FakeProvider {
    name: String,
    region: String,
    backend: Arc<FakeBackend>,
}

impl FakeProvider {
    async fn call(&self, opts: CallOpts) -> anyhow::Result<()> {
        self.backend
            .calls
            .lock()
            .unwrap()
            .push((self.region.clone(), opts));

        if let Some(barrier) = &self.backend.rendezvous {
            barrier.wait().await;
        }
        if self.backend.hanging.contains(&self.region) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.backend.failing.contains(&self.region) {
            anyhow::bail!("{} API error in {}: quota exceeded", self.name, self.region);
        }
        self.backend.deployed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Provider for FakeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn as_http(&self) -> Option<&dyn HttpProxyProvider> {
        if self.backend.capabilities.http {
            Some(self)
        } else {
            None
        }
    }

    fn as_socks(&self) -> Option<&dyn SocksProxyProvider> {
        if self.backend.capabilities.socks {
            Some(self)
        } else {
            None
        }
    }

    fn as_reverse(&self) -> Option<&dyn ReverseProxyProvider> {
        if self.backend.capabilities.reverse {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl HttpProxyProvider for FakeProvider {
    async fn deploy_http_proxy(&self, opts: &HttpProxyOpts) -> anyhow::Result<HttpDeployment> {
        self.call(CallOpts::Http(opts.clone())).await?;
        Ok(HttpDeployment {
            provider: self.name.clone(),
            region: self.region.clone(),
            api: format!(
                "https://{}.{}.example.com/release/{}",
                self.region, self.name, opts.function_name
            ),
        })
    }
}

#[async_trait]
impl SocksProxyProvider for FakeProvider {
    async fn deploy_socks_proxy(&self, opts: &SocksProxyOpts) -> anyhow::Result<()> {
        self.call(CallOpts::Socks(opts.clone())).await
    }
}

#[async_trait]
impl ReverseProxyProvider for FakeProvider {
    async fn deploy_reverse_proxy(
        &self,
        opts: &ReverseProxyOpts,
    ) -> anyhow::Result<ReverseDeployment> {
        self.call(CallOpts::Reverse(opts.clone())).await?;
        let n = self.backend.deployed.load(Ordering::SeqCst);
        Ok(ReverseDeployment {
            provider: self.name.clone(),
            region: self.region.clone(),
            api_id: format!("api-{}", n),
            service_id: format!("service-{}", n),
            plugin_id: if opts.ips.is_empty() {
                String::new()
            } else {
                format!("plugin-{}", n)
            },
            service_domain: format!("service-{}.{}.apigw.example.com", n, self.region),
            origin: opts.origin.clone(),
        })
    }
}

/// Register `provider` with `regions` in `catalog`, backed by `backend`.
pub fn register(
    catalog: &mut ProviderCatalog,
    provider: &str,
    regions: &[&str],
    backend: &Arc<FakeBackend>,
) {
    catalog.register_provider(provider, regions.iter().map(|r| r.to_string()).collect());
    let name = provider.to_string();
    let backend = Arc::clone(backend);
    catalog
        .register_factory(provider, move |region: &str, _: &Credential| -> anyhow::Result<Target> {
            if backend.broken.iter().any(|r| r == region) {
                anyhow::bail!("endpoint for {} is unreachable", region);
            }
            Ok(Arc::new(FakeProvider {
                name: name.clone(),
                region: region.to_string(),
                backend: Arc::clone(&backend),
            }) as Target)
        })
        .unwrap();
}

/// Catalog with a single fake provider.
pub fn catalog(provider: &str, regions: &[&str], backend: &Arc<FakeBackend>) -> ProviderCatalog {
    let mut catalog = ProviderCatalog::new();
    register(&mut catalog, provider, regions, backend);
    catalog
}

/// Credentials marking every listed provider as configured.
pub fn credentials(providers: &[&str]) -> ProviderCredentials {
    let mut creds = ProviderCredentials::new();
    for provider in providers {
        creds.insert(
            *provider,
            Credential::new()
                .with_field("secret_id", "id")
                .with_field("secret_key", "key"),
        );
    }
    creds
}

struct MemoryInner<S> {
    records: Mutex<S>,
    saved: Mutex<Vec<S>>,
    loads: AtomicUsize,
    fail_load: bool,
    fail_save: bool,
}

/// In-memory record store that counts loads and keeps every saved snapshot.
pub struct MemoryStore<S> {
    inner: Arc<MemoryInner<S>>,
}

impl<S> Clone for MemoryStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Default> Default for MemoryStore<S> {
    fn default() -> Self {
        Self::with_records(S::default())
    }
}

impl<S> MemoryStore<S> {
    pub fn with_records(records: S) -> Self {
        Self::build(records, false, false)
    }

    pub fn failing_load() -> Self
    where
        S: Default,
    {
        Self::build(S::default(), true, false)
    }

    pub fn failing_save() -> Self
    where
        S: Default,
    {
        Self::build(S::default(), false, true)
    }

    fn build(records: S, fail_load: bool, fail_save: bool) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                records: Mutex::new(records),
                saved: Mutex::new(Vec::new()),
                loads: AtomicUsize::new(0),
                fail_load,
                fail_save,
            }),
        }
    }

    pub fn loads(&self) -> usize {
        self.inner.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.inner.saved.lock().unwrap().len()
    }
}

impl<S: Clone> MemoryStore<S> {
    /// Current contents, as of the last successful save.
    pub fn records(&self) -> S {
        self.inner.records.lock().unwrap().clone()
    }

    pub fn saved(&self) -> Vec<S> {
        self.inner.saved.lock().unwrap().clone()
    }
}

impl<S: Clone + Send> RecordStore<S> for MemoryStore<S> {
    fn load(&self) -> Result<S, StoreError> {
        self.inner.loads.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_load {
            return Err(StoreError::Other("disk unavailable".to_string()));
        }
        Ok(self.records())
    }

    fn save(&self, records: &S) -> Result<(), StoreError> {
        self.inner.saved.lock().unwrap().push(records.clone());
        if self.inner.fail_save {
            return Err(StoreError::Other("disk full".to_string()));
        }
        *self.inner.records.lock().unwrap() = records.clone();
        Ok(())
    }
}
