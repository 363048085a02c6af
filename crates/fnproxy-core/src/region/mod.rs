//! Region pattern resolution.
//!
//! A pattern takes one of four shapes:
//! - `*`: every region the provider lists
//! - an exact region name such as `ap-guangzhou` or `cn-north-4`
//! - `prefix-*`: every region whose name starts with `prefix`
//! - `prefix-N`: the first `N` regions starting with `prefix`
//!
//! Matching always follows the provider's own listing order, so selecting
//! `ap-2` twice yields the same two regions.

use std::collections::HashSet;

use crate::diagnostics::Diagnostic;

/// Regions selected for one provider, plus anything skipped along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub regions: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

enum Selection<'l> {
    All,
    Regions(Vec<&'l str>),
    Skipped,
}

/// Resolve `patterns` against `listing`, the provider's authoritative regions.
///
/// Patterns are applied in order and the result is deduplicated keeping the
/// first occurrence. A `*` selects the whole listing and ends processing, so
/// patterns after it are never looked at.
pub fn resolve_regions(provider: &str, listing: &[String], patterns: &[String]) -> Resolution {
    let mut selected: Vec<&str> = Vec::new();
    let mut diagnostics = Vec::new();

    for pattern in patterns {
        match select(listing, pattern) {
            Selection::All => {
                selected = listing.iter().map(String::as_str).collect();
                break;
            }
            Selection::Regions(regions) => selected.extend(regions),
            Selection::Skipped => diagnostics.push(Diagnostic::debug(format!(
                "{} doesn't have region {}",
                provider, pattern
            ))),
        }
    }

    Resolution {
        regions: dedup_in_order(selected),
        diagnostics,
    }
}

fn select<'l>(listing: &'l [String], pattern: &str) -> Selection<'l> {
    if pattern == "*" {
        return Selection::All;
    }

    if let Some(region) = listing.iter().find(|r| r.as_str() == pattern) {
        return Selection::Regions(vec![region.as_str()]);
    }

    let Some((prefix, count)) = split_pattern(pattern) else {
        return Selection::Skipped;
    };

    let matched = listing
        .iter()
        .map(String::as_str)
        .filter(|r| r.starts_with(prefix));

    if count == "*" {
        return Selection::Regions(matched.collect());
    }

    // Region names like `cn-hangzhou` land here when the provider lacks them.
    match count.parse::<usize>() {
        Ok(n) => Selection::Regions(matched.take(n).collect()),
        Err(_) => Selection::Skipped,
    }
}

/// Split `prefix-suffix`; anything other than exactly two parts is rejected.
fn split_pattern(pattern: &str) -> Option<(&str, &str)> {
    let mut parts = pattern.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(suffix), None) => Some((prefix, suffix)),
        _ => None,
    }
}

fn dedup_in_order(regions: Vec<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    regions
        .into_iter()
        .filter(|r| seen.insert(*r))
        .map(str::to_string)
        .collect()
}
