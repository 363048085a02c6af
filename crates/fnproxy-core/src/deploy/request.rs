//! Deploy requests and their pre-flight validation.

use std::time::Duration;

use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{DeployError, DeployResult};
use crate::types::Module;

use super::jobs::{HttpJob, ModulePlan, ReverseJob, SocksJob};

/// Size of the socks verification key, in bytes
pub const SOCKS_KEY_LENGTH: usize = 8;

/// Key value that asks for a freshly generated key
pub const RANDOM_KEY: &str = "random";

const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Module selector plus its module-specific options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleRequest {
    Http,
    Socks {
        /// `host:port` the function dials back to
        addr: Option<String>,
        /// 8-byte key, or `random`
        key: Option<String>,
        /// `username:password`
        auth: Option<String>,
    },
    Reverse {
        origin: Option<String>,
        ips: Vec<String>,
    },
}

impl ModuleRequest {
    pub fn module(&self) -> Module {
        match self {
            ModuleRequest::Http => Module::Http,
            ModuleRequest::Socks { .. } => Module::Socks,
            ModuleRequest::Reverse { .. } => Module::Reverse,
        }
    }
}

/// Options for a deploy run
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub module: ModuleRequest,
    /// Provider ids, e.g. `tencent`
    pub providers: Vec<String>,
    /// Region patterns, e.g. `ap-*` or `us-2`
    pub regions: Vec<String>,
    /// Upper bound for each provider call; unbounded when `None`
    pub task_timeout: Option<Duration>,
}

impl DeployRequest {
    fn with_module(module: ModuleRequest) -> Self {
        Self {
            module,
            providers: Vec::new(),
            regions: Vec::new(),
            task_timeout: None,
        }
    }

    /// Create a request for the http module
    pub fn http() -> Self {
        Self::with_module(ModuleRequest::Http)
    }

    /// Create a request for the socks module, with a random key by default
    pub fn socks() -> Self {
        Self::with_module(ModuleRequest::Socks {
            addr: None,
            key: Some(RANDOM_KEY.to_string()),
            auth: None,
        })
    }

    /// Create a request for the reverse module
    pub fn reverse() -> Self {
        Self::with_module(ModuleRequest::Reverse {
            origin: None,
            ips: Vec::new(),
        })
    }

    /// Create a request for `module` with no module options set
    pub fn for_module(module: Module) -> Self {
        match module {
            Module::Http => Self::http(),
            Module::Socks => Self::socks(),
            Module::Reverse => Self::reverse(),
        }
    }

    pub fn with_providers<S: AsRef<str>>(mut self, providers: &[S]) -> Self {
        self.providers = providers.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn with_regions<S: AsRef<str>>(mut self, regions: &[S]) -> Self {
        self.regions = regions.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    /// Set the socks callback address; ignored for other modules
    pub fn with_addr(mut self, value: impl Into<String>) -> Self {
        if let ModuleRequest::Socks { addr, .. } = &mut self.module {
            *addr = Some(value.into());
        }
        self
    }

    /// Set the socks verification key; ignored for other modules
    pub fn with_key(mut self, value: impl Into<String>) -> Self {
        if let ModuleRequest::Socks { key, .. } = &mut self.module {
            *key = Some(value.into());
        }
        self
    }

    /// Set socks authentication; ignored for other modules
    pub fn with_auth(mut self, value: impl Into<String>) -> Self {
        if let ModuleRequest::Socks { auth, .. } = &mut self.module {
            *auth = Some(value.into());
        }
        self
    }

    /// Set the reverse proxy origin; ignored for other modules
    pub fn with_origin(mut self, value: impl Into<String>) -> Self {
        if let ModuleRequest::Reverse { origin, .. } = &mut self.module {
            *origin = Some(value.into());
        }
        self
    }

    /// Restrict reverse proxy access to these source IPs
    pub fn with_ips<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        if let ModuleRequest::Reverse { ips, .. } = &mut self.module {
            *ips = values.iter().map(|s| s.as_ref().to_string()).collect();
        }
        self
    }

    pub fn module(&self) -> Module {
        self.module.module()
    }

    /// Check module options and turn them into a dispatchable plan.
    ///
    /// Runs before any provider is contacted. For socks this generates the
    /// key when `random` was requested and resolves the callback address.
    pub async fn validate(&self) -> DeployResult<ModulePlan> {
        match &self.module {
            ModuleRequest::Http => Ok(ModulePlan::Http(HttpJob::default())),
            ModuleRequest::Socks { addr, key, auth } => {
                let addr = non_empty(addr).ok_or(DeployError::MissingOption { flag: "-a/--addr" })?;
                let key = non_empty(key).ok_or(DeployError::MissingOption { flag: "-k/--key" })?;
                let key = if key == RANDOM_KEY {
                    generate_key(SOCKS_KEY_LENGTH)?
                } else if key.len() != SOCKS_KEY_LENGTH {
                    return Err(DeployError::InvalidKeyLength {
                        expected: SOCKS_KEY_LENGTH,
                        actual: key.len(),
                    });
                } else {
                    key.to_string()
                };

                let auth = match non_empty(auth) {
                    Some(auth) => {
                        validate_auth(auth)?;
                        Some(auth.to_string())
                    }
                    None => None,
                };

                let callback = resolve_callback(addr).await?;
                Ok(ModulePlan::Socks(SocksJob::new(
                    key,
                    addr.to_string(),
                    callback.ip().to_string(),
                    callback.port(),
                    auth,
                )))
            }
            ModuleRequest::Reverse { origin, ips } => {
                let origin =
                    non_empty(origin).ok_or(DeployError::MissingOption { flag: "-o/--origin" })?;
                let url = url::Url::parse(origin).map_err(|e| DeployError::InvalidOrigin {
                    origin: origin.to_string(),
                    reason: e.to_string(),
                })?;
                if !url.has_host() {
                    return Err(DeployError::InvalidOrigin {
                        origin: origin.to_string(),
                        reason: "missing host".to_string(),
                    });
                }
                Ok(ModulePlan::Reverse(ReverseJob {
                    origin: origin.to_string(),
                    scheme: url.scheme().to_string(),
                    ips: ips.clone(),
                }))
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn validate_auth(auth: &str) -> DeployResult<()> {
    match auth.split_once(':') {
        Some((user, pass)) if !user.is_empty() && !pass.is_empty() => Ok(()),
        _ => Err(DeployError::InvalidAuth),
    }
}

async fn resolve_callback(addr: &str) -> DeployResult<std::net::SocketAddr> {
    let invalid = |reason: String| DeployError::InvalidAddress {
        addr: addr.to_string(),
        reason,
    };
    let mut resolved = tokio::net::lookup_host(addr)
        .await
        .map_err(|e| invalid(e.to_string()))?;
    resolved
        .next()
        .ok_or_else(|| invalid("no addresses found".to_string()))
}

/// Generate an alphanumeric key of `len` characters from the OS random source.
pub fn generate_key(len: usize) -> Result<String, rand::Error> {
    // Bytes at or above this bound are dropped to keep the alphabet uniform.
    let limit = 256 / KEY_ALPHABET.len() * KEY_ALPHABET.len();
    let mut key = String::with_capacity(len);
    let mut buf = [0u8; 32];

    while key.len() < len {
        OsRng.try_fill_bytes(&mut buf)?;
        for byte in buf {
            if key.len() == len {
                break;
            }
            let byte = byte as usize;
            if byte < limit {
                key.push(KEY_ALPHABET[byte % KEY_ALPHABET.len()] as char);
            }
        }
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_shape() {
        let key = generate_key(SOCKS_KEY_LENGTH).unwrap();
        assert_eq!(key.len(), SOCKS_KEY_LENGTH);
        assert!(key.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_key_differs() {
        let a = generate_key(SOCKS_KEY_LENGTH).unwrap();
        let b = generate_key(SOCKS_KEY_LENGTH).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_builders_ignore_other_modules() {
        let request = DeployRequest::http().with_addr("1.2.3.4:80").with_origin("https://x");
        assert_eq!(request.module, ModuleRequest::Http);
    }

    #[test]
    fn test_validate_auth() {
        assert!(validate_auth("user:pass").is_ok());
        assert!(validate_auth("user").is_err());
        assert!(validate_auth(":pass").is_err());
        assert!(validate_auth("user:").is_err());
    }

    #[tokio::test]
    async fn test_validate_socks_requires_addr() {
        let err = DeployRequest::socks().validate().await.unwrap_err();
        assert!(matches!(err, DeployError::MissingOption { flag: "-a/--addr" }));
    }

    #[tokio::test]
    async fn test_validate_socks_rejects_short_key() {
        let err = DeployRequest::socks()
            .with_addr("127.0.0.1:1080")
            .with_key("abc")
            .validate()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeployError::InvalidKeyLength {
                expected: 8,
                actual: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_validate_socks_explicit_key() {
        let plan = DeployRequest::socks()
            .with_addr("127.0.0.1:1080")
            .with_key("abcdefgh")
            .validate()
            .await
            .unwrap();
        let ModulePlan::Socks(job) = plan else {
            panic!("expected socks plan");
        };
        assert_eq!(job.key, "abcdefgh");
        assert_eq!(job.host, "127.0.0.1");
        assert_eq!(job.port, 1080);
        assert!(job.auth.is_none());
    }

    #[tokio::test]
    async fn test_validate_socks_bad_address() {
        let err = DeployRequest::socks()
            .with_addr("no-port-here")
            .validate()
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_validate_reverse() {
        let err = DeployRequest::reverse().validate().await.unwrap_err();
        assert!(matches!(err, DeployError::MissingOption { flag: "-o/--origin" }));

        let err = DeployRequest::reverse()
            .with_origin("not a url")
            .validate()
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidOrigin { .. }));

        let plan = DeployRequest::reverse()
            .with_origin("http://203.0.113.7:8080")
            .with_ips(&["198.51.100.1"])
            .validate()
            .await
            .unwrap();
        let ModulePlan::Reverse(job) = plan else {
            panic!("expected reverse plan");
        };
        assert_eq!(job.scheme, "http");
        assert_eq!(job.origin, "http://203.0.113.7:8080");
        assert_eq!(job.ips, vec!["198.51.100.1".to_string()]);
    }
}
