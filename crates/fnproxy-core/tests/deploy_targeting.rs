//! Tests for building deployment targets from providers and region patterns.

mod support;

use fnproxy_core::config::{Credential, ProviderCredentials};
use fnproxy_core::deploy::TargetBuilder;
use fnproxy_core::diagnostics::Severity;

use support::FakeBackend;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pair(provider: &str, region: &str) -> (String, String) {
    (provider.to_string(), region.to_string())
}

#[test]
fn builds_one_target_per_resolved_region() {
    let backend = FakeBackend::all().into_shared();
    let catalog = support::catalog("fake", &["us-1", "us-2", "eu-1"], &backend);
    let creds = support::credentials(&["fake"]);

    let set = TargetBuilder::new(&catalog, &creds).build(&strings(&["fake"]), &strings(&["us-*"]));

    assert_eq!(set.len(), 2);
    assert_eq!(set.pairs(), vec![pair("fake", "us-1"), pair("fake", "us-2")]);
    assert!(set.diagnostics.is_empty());
}

#[test]
fn unknown_provider_is_skipped() {
    let backend = FakeBackend::all().into_shared();
    let catalog = support::catalog("fake", &["us-1"], &backend);
    let creds = support::credentials(&["fake", "ghost"]);

    let set =
        TargetBuilder::new(&catalog, &creds).build(&strings(&["ghost", "fake"]), &strings(&["*"]));

    assert_eq!(set.pairs(), vec![pair("fake", "us-1")]);
    assert_eq!(set.diagnostics.len(), 1);
    assert_eq!(set.diagnostics[0].severity, Severity::Error);
    assert!(set.diagnostics[0].message.contains("ghost is not a valid provider"));
}

#[test]
fn unconfigured_provider_is_ignored_with_warning() {
    let backend = FakeBackend::all().into_shared();
    let mut catalog = support::catalog("fake", &["us-1"], &backend);
    support::register(&mut catalog, "other", &["eu-1"], &backend);

    let mut creds = support::credentials(&["fake"]);
    creds.insert("other", Credential::new().with_field("secret_id", ""));

    let set =
        TargetBuilder::new(&catalog, &creds).build(&strings(&["fake", "other"]), &strings(&["*"]));

    assert_eq!(set.pairs(), vec![pair("fake", "us-1")]);
    assert_eq!(set.diagnostics.len(), 1);
    assert_eq!(set.diagnostics[0].severity, Severity::Warning);
    assert!(set.diagnostics[0].message.contains("other's credential config not set"));
}

#[test]
fn provider_without_matching_region_is_skipped() {
    let backend = FakeBackend::all().into_shared();
    let mut catalog = support::catalog("fake", &["us-1"], &backend);
    support::register(&mut catalog, "other", &["eu-1"], &backend);
    let creds = support::credentials(&["fake", "other"]);

    let set =
        TargetBuilder::new(&catalog, &creds).build(&strings(&["fake", "other"]), &strings(&["eu-*"]));

    assert_eq!(set.pairs(), vec![pair("other", "eu-1")]);
    assert_eq!(set.diagnostics.len(), 1);
    assert!(set.diagnostics[0].message.contains("No region available for fake"));
}

#[test]
fn construction_failure_drops_only_that_pair() {
    let backend = FakeBackend::all().broken(&["us-2"]).into_shared();
    let catalog = support::catalog("fake", &["us-1", "us-2", "us-3"], &backend);
    let creds = support::credentials(&["fake"]);

    let set = TargetBuilder::new(&catalog, &creds).build(&strings(&["fake"]), &strings(&["*"]));

    assert_eq!(set.pairs(), vec![pair("fake", "us-1"), pair("fake", "us-3")]);
    assert_eq!(set.diagnostics.len(), 1);
    assert!(set.diagnostics[0].message.contains("Failed to create fake us-2"));
    assert!(set.diagnostics[0].message.contains("unreachable"));
}

#[test]
fn duplicate_providers_are_collapsed() {
    let backend = FakeBackend::all().into_shared();
    let catalog = support::catalog("fake", &["us-1"], &backend);
    let creds = support::credentials(&["fake"]);

    let set =
        TargetBuilder::new(&catalog, &creds).build(&strings(&["fake", "fake"]), &strings(&["*"]));

    assert_eq!(set.len(), 1);
}

#[test]
fn nothing_configured_yields_empty_set() {
    let backend = FakeBackend::all().into_shared();
    let catalog = support::catalog("fake", &["us-1"], &backend);
    let creds = ProviderCredentials::new();

    let set = TargetBuilder::new(&catalog, &creds).build(&strings(&["fake"]), &strings(&["*"]));

    assert!(set.is_empty());
    assert_eq!(set.diagnostics.len(), 1);
}

#[test]
fn builtin_provider_without_backend_is_diagnosed() {
    let catalog = fnproxy_core::provider::ProviderCatalog::with_builtin_providers();
    let creds = support::credentials(&["tencent"]);

    let set = TargetBuilder::new(&catalog, &creds)
        .build(&strings(&["tencent"]), &strings(&["ap-beijing", "ap-tokyo"]));

    assert!(set.is_empty());
    assert_eq!(set.diagnostics.len(), 2);
    assert!(
        set.diagnostics
            .iter()
            .all(|d| d.message.contains("No deployment backend"))
    );
}
