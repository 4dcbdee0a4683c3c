//! Per-asset version counters.
//!
//! Index 0 is the ingested state. The counter only moves through
//! [`VersionChain::advance`], which promotion calls exactly once per
//! accepted draft.

use std::collections::HashMap;
use std::str::FromStr;

use atelier_core::asset::AssetId;
use atelier_core::error::CoreError;
use atelier_core::types::VersionIndex;
use serde::{Deserialize, Serialize};

/// Which accepted version a refinement branches from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefineSource {
    /// Version 0.
    Original,
    /// The current index.
    #[default]
    Latest,
}

impl FromStr for RefineSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Self::Original),
            "latest" => Ok(Self::Latest),
            other => Err(CoreError::Validation(format!(
                "Unknown refine source '{other}', expected original or latest"
            ))),
        }
    }
}

#[derive(Debug, Default)]
pub struct VersionChain {
    current: HashMap<AssetId, VersionIndex>,
}

impl VersionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an ingested asset at version 0.
    pub fn register(&mut self, asset_id: &AssetId) {
        self.current.entry(asset_id.clone()).or_insert(0);
    }

    pub fn current(&self, asset_id: &AssetId) -> Option<VersionIndex> {
        self.current.get(asset_id).copied()
    }

    /// Advance by exactly one and return the new index.
    pub fn advance(&mut self, asset_id: &AssetId) -> Result<VersionIndex, CoreError> {
        let current = self
            .current
            .get_mut(asset_id)
            .ok_or_else(|| CoreError::asset_not_found(asset_id.as_str()))?;
        *current += 1;
        Ok(*current)
    }

    /// Version a refinement from `source` starts at.
    pub fn source_version(
        &self,
        asset_id: &AssetId,
        source: RefineSource,
    ) -> Result<VersionIndex, CoreError> {
        let current = self
            .current(asset_id)
            .ok_or_else(|| CoreError::asset_not_found(asset_id.as_str()))?;
        Ok(match source {
            RefineSource::Original => 0,
            RefineSource::Latest => current,
        })
    }

    pub fn remove(&mut self, asset_id: &AssetId) -> Option<VersionIndex> {
        self.current.remove(asset_id)
    }
}
