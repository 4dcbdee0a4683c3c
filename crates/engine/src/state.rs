//! The engine's single mutable state.
//!
//! Every public engine operation takes the state lock once and performs
//! all of its checks before its first mutation, so a failed operation
//! leaves every map below exactly as it found it.

use std::collections::HashMap;

use atelier_core::asset::{Asset, AssetId};
use atelier_core::error::CoreError;
use atelier_core::types::RequestId;
use indexmap::IndexMap;

use crate::drafts::DraftStage;
use crate::ledger::AnnotationLedger;
use crate::lookup::{LiveResultStore, NamingConventionPool};
use crate::promotion::ReviewOutcome;
use crate::requests::RequestTable;
use crate::versions::VersionChain;

#[derive(Debug, Default)]
pub struct EngineState {
    /// Canonical collection in ingestion order. Only ingest, delete, and
    /// promotion write here.
    pub(crate) canonical: IndexMap<AssetId, Asset>,
    pub(crate) versions: VersionChain,
    pub(crate) ledger: AnnotationLedger,
    pub(crate) drafts: DraftStage,
    pub(crate) requests: RequestTable,
    /// Accepted results keyed by (asset, version).
    pub(crate) live_results: LiveResultStore,
    pub(crate) result_pool: NamingConventionPool,
    /// How the last finished review cycle ended, per asset.
    pub(crate) outcomes: HashMap<AssetId, ReviewOutcome>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn asset(&self, asset_id: &AssetId) -> Result<&Asset, CoreError> {
        self.canonical
            .get(asset_id)
            .ok_or_else(|| CoreError::asset_not_found(asset_id.as_str()))
    }

    pub(crate) fn insert_asset(&mut self, asset: Asset) -> Result<(), CoreError> {
        if self.canonical.contains_key(&asset.id) {
            return Err(CoreError::Conflict(format!(
                "Asset {} already exists",
                asset.id
            )));
        }
        self.versions.register(&asset.id);
        self.live_results
            .record(&asset.id, asset.version, asset.locator.clone());
        self.canonical.insert(asset.id.clone(), asset);
        Ok(())
    }

    /// Remove an asset and everything keyed to it.
    pub(crate) fn remove_asset(&mut self, asset_id: &AssetId) -> Result<RemovedAsset, CoreError> {
        let asset = self
            .canonical
            .shift_remove(asset_id)
            .ok_or_else(|| CoreError::asset_not_found(asset_id.as_str()))?;
        let notes_purged = self.ledger.purge(asset_id);
        let draft_discarded = self.drafts.clear(asset_id).is_some();
        let abandoned_request = self.requests.abandon(asset_id);
        self.versions.remove(asset_id);
        self.live_results.purge(asset_id);
        self.outcomes.remove(asset_id);
        Ok(RemovedAsset {
            asset,
            notes_purged,
            draft_discarded,
            abandoned_request,
        })
    }

    /// Assets with at least one unresolved note, in collection order.
    pub(crate) fn pending_review(&self) -> Vec<Asset> {
        self.canonical
            .values()
            .filter(|asset| self.ledger.active_count(&asset.id) > 0)
            .cloned()
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct RemovedAsset {
    pub asset: Asset,
    pub notes_purged: usize,
    pub draft_discarded: bool,
    pub abandoned_request: Option<RequestId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use atelier_core::annotation::{Region, DEFAULT_MIN_DRAG};
    use atelier_core::asset::{AssetKind, NewAsset};

    fn asset(id: &str) -> Asset {
        Asset::ingested(NewAsset::new(id, &format!("{id}.png"), &format!("/img/{id}.png"), AssetKind::Image)).unwrap()
    }

    #[test]
    fn duplicate_ingest_is_a_conflict() {
        let mut state = EngineState::new();
        state.insert_asset(asset("A")).unwrap();
        assert_matches!(state.insert_asset(asset("A")), Err(CoreError::Conflict(_)));
        assert_eq!(state.canonical.len(), 1);
    }

    #[test]
    fn collection_keeps_ingestion_order_after_removal() {
        let mut state = EngineState::new();
        for id in ["C", "A", "B"] {
            state.insert_asset(asset(id)).unwrap();
        }
        state.remove_asset(&AssetId::from("A")).unwrap();

        let ids: Vec<&str> = state.canonical.keys().map(AssetId::as_str).collect();
        assert_eq!(ids, vec!["C", "B"]);
    }

    #[test]
    fn removal_purges_keyed_state() {
        let mut state = EngineState::new();
        state.insert_asset(asset("A")).unwrap();
        let region = Region::from_corners(0.1, 0.1, 0.3, 0.3, DEFAULT_MIN_DRAG).unwrap();
        state
            .ledger
            .add_note(&AssetId::from("A"), region, "brighten", DEFAULT_MIN_DRAG)
            .unwrap();

        let removed = state.remove_asset(&AssetId::from("A")).unwrap();

        assert_eq!(removed.notes_purged, 1);
        assert!(state.versions.current(&AssetId::from("A")).is_none());
        assert!(state.pending_review().is_empty());
        assert_matches!(
            state.remove_asset(&AssetId::from("A")),
            Err(CoreError::NotFound { .. })
        );
    }
}
