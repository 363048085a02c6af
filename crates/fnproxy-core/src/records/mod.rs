//! Deployment records persisted between runs.
//!
//! - http/socks: at most one record per (provider, region); an empty endpoint
//!   or key marks a function whose trigger still has to be created
//! - reverse: append-only history, several records per (provider, region)

pub mod store;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use store::{RecordStore, StoreError, TomlRecordStore};

/// A keyed record that knows whether its endpoint is live.
pub trait LiveRecord {
    fn is_live(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRecord {
    /// Public endpoint URL; empty means the trigger is missing
    #[serde(default)]
    pub api: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
}

impl LiveRecord for HttpRecord {
    fn is_live(&self) -> bool {
        !self.api.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocksRecord {
    /// Verification key; empty means the trigger is missing
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
}

impl LiveRecord for SocksRecord {
    fn is_live(&self) -> bool {
        !self.key.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseRecord {
    pub provider: String,
    pub region: String,
    /// Gateway id
    pub api_id: String,
    /// Public URL, `<origin scheme>://<service domain>`
    pub api: String,
    pub origin: String,
    pub service_id: String,
    #[serde(default)]
    pub plugin_id: String,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
}

/// Records keyed by provider, then region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyedRecords<R> {
    entries: BTreeMap<String, BTreeMap<String, R>>,
}

impl<R> Default for KeyedRecords<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<R> KeyedRecords<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, provider: &str, region: &str) -> Option<&R> {
        self.entries.get(provider).and_then(|m| m.get(region))
    }

    /// Insert or overwrite the record for (provider, region).
    pub fn set(&mut self, provider: &str, region: &str, record: R) {
        self.entries
            .entry(provider.to_string())
            .or_default()
            .insert(region.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records as `(provider, region, record)`, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &R)> {
        self.entries.iter().flat_map(|(provider, regions)| {
            regions
                .iter()
                .map(move |(region, record)| (provider.as_str(), region.as_str(), record))
        })
    }
}

pub type HttpRecords = KeyedRecords<HttpRecord>;
pub type SocksRecords = KeyedRecords<SocksRecord>;

/// Every successful reverse deployment, in the order it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseHistory {
    #[serde(default)]
    records: Vec<ReverseRecord>,
}

impl ReverseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: ReverseRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ReverseRecord] {
        &self.records
    }

    pub fn for_target<'a>(
        &'a self,
        provider: &'a str,
        region: &'a str,
    ) -> impl Iterator<Item = &'a ReverseRecord> {
        self.records
            .iter()
            .filter(move |r| r.provider == provider && r.region == region)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
