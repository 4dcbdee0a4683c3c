//! Version chain lookup: "which result is version N of asset A".
//!
//! A [`VersionChainResolver`] asks each [`ResultSource`] in order and
//! returns the first hit. Absence is an ordinary outcome.

use std::collections::HashMap;

use atelier_core::asset::AssetId;
use atelier_core::naming::{chain_key, file_name, result_key};
use atelier_core::types::VersionIndex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    Live,
    Pool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResult {
    pub version: VersionIndex,
    pub locator: String,
    pub origin: ResultOrigin,
}

/// One place a versioned result may be found.
pub trait ResultSource: Send + Sync {
    /// `name` is the asset's version-0 name.
    fn find(&self, asset_id: &AssetId, name: &str, version: VersionIndex) -> Option<ResolvedResult>;
}

// ---------------------------------------------------------------------------
// Live results keyed by (asset, version)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LiveResultStore {
    results: HashMap<(AssetId, VersionIndex), String>,
}

impl LiveResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, asset_id: &AssetId, version: VersionIndex, locator: impl Into<String>) {
        self.results
            .insert((asset_id.clone(), version), locator.into());
    }

    /// Forget every version of `asset_id`.
    pub fn purge(&mut self, asset_id: &AssetId) {
        self.results.retain(|(id, _), _| id != asset_id);
    }
}

impl ResultSource for LiveResultStore {
    fn find(&self, asset_id: &AssetId, _name: &str, version: VersionIndex) -> Option<ResolvedResult> {
        self.results
            .get(&(asset_id.clone(), version))
            .map(|locator| ResolvedResult {
                version,
                locator: locator.clone(),
                origin: ResultOrigin::Live,
            })
    }
}

// ---------------------------------------------------------------------------
// Known result names matched by naming convention
// ---------------------------------------------------------------------------

/// A precomputed pool of result locators, matched by `{stem}_{N}` key.
///
/// Two locators that reduce to the same key collide; the first one
/// inserted wins.
#[derive(Debug, Default)]
pub struct NamingConventionPool {
    by_key: HashMap<String, String>,
}

impl NamingConventionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_locators<I, S>(locators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pool = Self::new();
        for locator in locators {
            pool.insert(locator);
        }
        pool
    }

    /// Add a locator; returns `false` if its key was already taken.
    pub fn insert(&mut self, locator: impl Into<String>) -> bool {
        let locator = locator.into();
        let key = result_key(file_name(&locator));
        if self.by_key.contains_key(&key) {
            tracing::warn!(key = %key, locator = %locator, "Result name collides with an existing entry");
            return false;
        }
        self.by_key.insert(key, locator);
        true
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl ResultSource for NamingConventionPool {
    fn find(&self, _asset_id: &AssetId, name: &str, version: VersionIndex) -> Option<ResolvedResult> {
        self.by_key
            .get(&chain_key(name, version))
            .map(|locator| ResolvedResult {
                version,
                locator: locator.clone(),
                origin: ResultOrigin::Pool,
            })
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

pub struct VersionChainResolver<'a> {
    sources: Vec<&'a dyn ResultSource>,
}

impl<'a> VersionChainResolver<'a> {
    /// Sources are consulted in the given order.
    pub fn new(sources: Vec<&'a dyn ResultSource>) -> Self {
        Self { sources }
    }

    /// Live results first, then the naming-convention pool.
    pub fn standard(live: &'a LiveResultStore, pool: &'a NamingConventionPool) -> Self {
        Self::new(vec![live as &dyn ResultSource, pool])
    }

    pub fn resolve(&self, asset_id: &AssetId, name: &str, version: VersionIndex) -> Option<ResolvedResult> {
        self.sources
            .iter()
            .find_map(|source| source.find(asset_id, name, version))
    }

    /// Every version in `0..=current` that resolves, oldest first.
    pub fn versions_available(
        &self,
        asset_id: &AssetId,
        name: &str,
        current: VersionIndex,
    ) -> Vec<ResolvedResult> {
        (0..=current)
            .filter_map(|v| self.resolve(asset_id, name, v))
            .collect()
    }
}
