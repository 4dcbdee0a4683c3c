//! [`RevisionEngine`]: the public face of the revision workflow.
//!
//! Cheap to clone; all clones share one state lock and one event bus.

use std::sync::Arc;

use atelier_core::annotation::{Note, Region};
use atelier_core::asset::{Asset, AssetId, NewAsset};
use atelier_core::error::CoreError;
use atelier_core::generation::RevisionGenerator;
use atelier_core::revision_events::*;
use atelier_core::types::{NoteId, RequestId, VersionIndex};
use atelier_events::{EventBus, RevisionEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::{LiveBackend, RevisionBackend, RevisionJob, SimulatedBackend};
use crate::config::EngineConfig;
use crate::dispatcher::{BatchOutcome, RequestHandle, RevisionInput};
use crate::drafts::Draft;
use crate::lookup::{ResolvedResult, VersionChainResolver};
use crate::promotion::{ClearedReview, Promotion, PromotionPolicy, ReviewOutcome, ReviewState};
use crate::requests::{RevisionRequest, RevisionStrategy};
use crate::state::EngineState;

/// Which half of the original/draft preview pair to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewVariant {
    #[default]
    Original,
    Draft,
}

#[derive(Clone)]
pub struct RevisionEngine {
    state: Arc<RwLock<EngineState>>,
    config: EngineConfig,
    simulated: Arc<dyn RevisionBackend>,
    live: Option<Arc<dyn RevisionBackend>>,
    events: Arc<EventBus>,
}

impl RevisionEngine {
    /// Engine with the simulated strategy only.
    pub fn new(config: EngineConfig, events: Arc<EventBus>) -> Self {
        Self {
            state: Arc::new(RwLock::new(EngineState::new())),
            simulated: Arc::new(SimulatedBackend::new(config.simulated_delay)),
            live: None,
            config,
            events,
        }
    }

    /// Enable the live strategy with the given generator.
    pub fn with_generator(mut self, generator: Arc<dyn RevisionGenerator>) -> Self {
        self.live = Some(Arc::new(LiveBackend::new(generator, self.config.live_timeout)));
        self
    }

    /// Replace the backend behind the live strategy.
    pub fn with_live_backend(mut self, backend: Arc<dyn RevisionBackend>) -> Self {
        self.live = Some(backend);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn promotion_policy(&self) -> PromotionPolicy {
        self.config.promotion_policy
    }

    pub fn has_live_strategy(&self) -> bool {
        self.live.is_some()
    }

    fn emit(&self, event: RevisionEvent) {
        self.events.publish(event);
    }

    // -----------------------------------------------------------------------
    // Assets
    // -----------------------------------------------------------------------

    /// Add a version-0 asset to the canonical collection.
    pub async fn ingest(&self, input: NewAsset) -> Result<Asset, CoreError> {
        let asset = Asset::ingested(input)?;
        self.state.write().await.insert_asset(asset.clone())?;

        tracing::info!(asset_id = %asset.id, kind = asset.kind.as_str(), "Asset ingested");
        self.emit(
            RevisionEvent::new(EVENT_ASSET_INGESTED)
                .for_asset(&asset.id)
                .with_payload(serde_json::json!({ "name": asset.name, "kind": asset.kind })),
        );
        Ok(asset)
    }

    pub async fn get(&self, asset_id: &AssetId) -> Result<Asset, CoreError> {
        self.state.read().await.asset(asset_id).cloned()
    }

    /// The canonical collection in ingestion order.
    pub async fn list_canonical(&self) -> Vec<Asset> {
        self.state.read().await.canonical.values().cloned().collect()
    }

    /// Assets with at least one unresolved note.
    pub async fn pending_review(&self) -> Vec<Asset> {
        self.state.read().await.pending_review()
    }

    /// Superseded states of an asset, newest first.
    pub async fn history(&self, asset_id: &AssetId) -> Result<Vec<Asset>, CoreError> {
        let state = self.state.read().await;
        Ok(state.asset(asset_id)?.history().to_vec())
    }

    /// Remove an asset with its notes, draft, and version counter.
    ///
    /// A request still running for it will complete as failed.
    pub async fn delete(&self, asset_id: &AssetId) -> Result<Asset, CoreError> {
        let removed = self.state.write().await.remove_asset(asset_id)?;

        tracing::info!(
            asset_id = %asset_id,
            notes_purged = removed.notes_purged,
            draft_discarded = removed.draft_discarded,
            "Asset deleted",
        );
        if let Some(request_id) = removed.abandoned_request {
            tracing::warn!(asset_id = %asset_id, request_id = %request_id, "In-flight revision abandoned");
            self.emit(
                RevisionEvent::new(EVENT_REVISION_FAILED)
                    .for_asset(asset_id)
                    .with_request(request_id)
                    .with_payload(serde_json::json!({ "error": "asset deleted" })),
            );
        }
        self.emit(RevisionEvent::new(EVENT_ASSET_DELETED).for_asset(asset_id));
        Ok(removed.asset)
    }

    // -----------------------------------------------------------------------
    // Annotation ledger
    // -----------------------------------------------------------------------

    /// Attach a note to an asset. Starts a fresh review cycle.
    pub async fn add_note(
        &self,
        asset_id: &AssetId,
        region: Region,
        text: &str,
    ) -> Result<Note, CoreError> {
        let note = {
            let mut state = self.state.write().await;
            state.asset(asset_id)?;
            let note = state
                .ledger
                .add_note(asset_id, region, text, self.config.min_drag)?;
            state.outcomes.remove(asset_id);
            note
        };

        tracing::debug!(asset_id = %asset_id, note_id = %note.id, "Note added");
        self.emit(
            RevisionEvent::new(EVENT_NOTE_ADDED)
                .for_asset(asset_id)
                .with_payload(serde_json::json!({ "note_id": note.id })),
        );
        Ok(note)
    }

    /// Resolve one note. Resolving an already resolved note is a no-op.
    ///
    /// Resolving the last open note of an asset with no draft and no
    /// pending request ends its cycle as cleared.
    pub async fn resolve(&self, note_id: &NoteId) -> Result<Note, CoreError> {
        let (note, flipped, cleared) = {
            let mut state = self.state.write().await;
            let flipped = state.ledger.resolve(note_id)?;
            let note = state
                .ledger
                .get(note_id)
                .cloned()
                .ok_or_else(|| CoreError::note_not_found(note_id))?;
            let cleared = flipped && !state.is_under_review(&note.asset_id);
            if cleared {
                state
                    .outcomes
                    .insert(note.asset_id.clone(), ReviewOutcome::Cleared);
            }
            (note, flipped, cleared)
        };

        if flipped {
            tracing::debug!(asset_id = %note.asset_id, note_id = %note.id, "Note resolved");
            self.emit(
                RevisionEvent::new(EVENT_NOTE_RESOLVED)
                    .for_asset(&note.asset_id)
                    .with_payload(serde_json::json!({ "note_id": note.id })),
            );
        }
        if cleared {
            self.emit(RevisionEvent::new(EVENT_REVIEW_CLEARED).for_asset(&note.asset_id));
        }
        Ok(note)
    }

    pub async fn active_count(&self, asset_id: &AssetId) -> Result<usize, CoreError> {
        let state = self.state.read().await;
        state.asset(asset_id)?;
        Ok(state.ledger.active_count(asset_id))
    }

    /// All notes on an asset, resolved included, oldest first.
    pub async fn notes(&self, asset_id: &AssetId) -> Result<Vec<Note>, CoreError> {
        let state = self.state.read().await;
        state.asset(asset_id)?;
        Ok(state.ledger.notes_for(asset_id))
    }

    /// Unresolved notes of `asset_id` among `note_ids`.
    pub async fn select_for_submission(&self, asset_id: &AssetId, note_ids: &[NoteId]) -> Vec<Note> {
        self.state
            .read()
            .await
            .ledger
            .select_for_submission(asset_id, note_ids)
    }

    // -----------------------------------------------------------------------
    // Dispatcher
    // -----------------------------------------------------------------------

    fn backend_for(&self, strategy: RevisionStrategy) -> Result<Arc<dyn RevisionBackend>, CoreError> {
        match strategy {
            RevisionStrategy::Simulated => Ok(Arc::clone(&self.simulated)),
            RevisionStrategy::Live => self.live.clone().ok_or_else(|| {
                CoreError::Validation("Live strategy is not configured".to_string())
            }),
        }
    }

    /// Issue a revision request for one asset.
    ///
    /// Fails with `AssetBusy` while another request for the same asset is
    /// pending. On success the request runs in the background; its result
    /// is staged as the asset's draft whether or not the handle is awaited.
    pub async fn submit(
        &self,
        asset_id: &AssetId,
        input: RevisionInput,
    ) -> Result<RequestHandle, CoreError> {
        let backend = self.backend_for(input.strategy)?;
        let (job, request) = self.state.write().await.begin_revision(asset_id, &input)?;

        tracing::info!(
            asset_id = %asset_id,
            request_id = %request.id,
            strategy = request.strategy.as_str(),
            source_version = request.source_version,
            notes = request.note_ids.len(),
            "Revision submitted",
        );
        self.emit(
            RevisionEvent::new(EVENT_REVISION_SUBMITTED)
                .for_asset(asset_id)
                .with_request(request.id)
                .with_payload(serde_json::json!({
                    "strategy": request.strategy,
                    "source_version": request.source_version,
                    "note_ids": request.note_ids,
                })),
        );

        let engine = self.clone();
        let completion = tokio::spawn(async move { engine.execute(job, backend).await });
        Ok(RequestHandle::new(request.id, asset_id.clone(), completion))
    }

    async fn execute(self, job: RevisionJob, backend: Arc<dyn RevisionBackend>) -> Result<Draft, CoreError> {
        let outcome = backend.produce(&job).await;
        let completed = self.state.write().await.complete_revision(&job, outcome);

        let asset_id = &job.source.id;
        match &completed {
            Ok(draft) => {
                tracing::info!(
                    asset_id = %asset_id,
                    request_id = %job.request_id,
                    result = %draft.result_asset.name,
                    "Revision completed, draft staged",
                );
                self.emit(
                    RevisionEvent::new(EVENT_REVISION_COMPLETED)
                        .for_asset(asset_id)
                        .with_request(job.request_id)
                        .with_payload(serde_json::json!({
                            "result_name": draft.result_asset.name,
                            "result_locator": draft.result_asset.locator,
                        })),
                );
            }
            Err(CoreError::Conflict(_)) => {
                tracing::info!(asset_id = %asset_id, request_id = %job.request_id, "Result of abandoned revision dropped");
            }
            Err(e) => {
                tracing::warn!(asset_id = %asset_id, request_id = %job.request_id, error = %e, "Revision failed");
                self.emit(
                    RevisionEvent::new(EVENT_REVISION_FAILED)
                        .for_asset(asset_id)
                        .with_request(job.request_id)
                        .with_payload(serde_json::json!({ "error": e.to_string() })),
                );
            }
        }
        completed
    }

    /// Submit one independent request per asset ("refine all").
    ///
    /// Note ids in `input` are matched against each asset separately.
    pub async fn submit_batch(&self, asset_ids: &[AssetId], input: RevisionInput) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(asset_ids.len());
        for asset_id in asset_ids {
            let result = self.submit(asset_id, input.clone()).await;
            if let Err(e) = &result {
                tracing::debug!(asset_id = %asset_id, error = %e, "Batch entry rejected");
            }
            outcomes.push(BatchOutcome {
                asset_id: asset_id.clone(),
                result,
            });
        }
        outcomes
    }

    /// Most recent request for an asset, if any.
    pub async fn request_status(&self, asset_id: &AssetId) -> Result<Option<RevisionRequest>, CoreError> {
        let state = self.state.read().await;
        state.asset(asset_id)?;
        Ok(state.requests.latest_for(asset_id).cloned())
    }

    pub async fn request(&self, request_id: &RequestId) -> Result<RevisionRequest, CoreError> {
        self.state
            .read()
            .await
            .requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "RevisionRequest",
                id: request_id.to_string(),
            })
    }

    // -----------------------------------------------------------------------
    // Draft stage
    // -----------------------------------------------------------------------

    pub async fn draft(&self, asset_id: &AssetId) -> Result<Option<Draft>, CoreError> {
        let state = self.state.read().await;
        state.asset(asset_id)?;
        Ok(state.drafts.get(asset_id).cloned())
    }

    /// One half of the original/draft toggle.
    pub async fn preview(&self, asset_id: &AssetId, variant: PreviewVariant) -> Result<Asset, CoreError> {
        let state = self.state.read().await;
        let canonical = state.asset(asset_id)?;
        match variant {
            PreviewVariant::Original => Ok(canonical.clone()),
            PreviewVariant::Draft => state
                .drafts
                .get(asset_id)
                .map(|d| d.result_asset.clone())
                .ok_or_else(|| CoreError::NoDraftStaged {
                    asset_id: asset_id.to_string(),
                }),
        }
    }

    // -----------------------------------------------------------------------
    // Promotion workflow
    // -----------------------------------------------------------------------

    /// Accept the staged draft as the asset's new canonical state.
    pub async fn promote(&self, asset_id: &AssetId) -> Result<Promotion, CoreError> {
        let policy = self.config.promotion_policy;
        let promotion = self.state.write().await.promote(asset_id, policy)?;

        tracing::info!(
            asset_id = %asset_id,
            version = promotion.asset.version,
            resolved_notes = promotion.resolved_notes.len(),
            "Draft promoted",
        );
        self.emit(
            RevisionEvent::new(EVENT_DRAFT_PROMOTED)
                .for_asset(asset_id)
                .with_payload(serde_json::json!({
                    "version": promotion.asset.version,
                    "previous_version": promotion.previous_version,
                    "resolved_notes": promotion.resolved_notes,
                })),
        );
        Ok(promotion)
    }

    /// Drop the staged draft, if any. Canonical state is untouched.
    pub async fn discard(&self, asset_id: &AssetId) -> Result<Option<Draft>, CoreError> {
        let discarded = self.state.write().await.discard(asset_id)?;
        if let Some(draft) = &discarded {
            tracing::info!(asset_id = %asset_id, result = %draft.result_asset.name, "Draft discarded");
            self.emit(
                RevisionEvent::new(EVENT_DRAFT_DISCARDED)
                    .for_asset(asset_id)
                    .with_request(draft.request_id),
            );
        }
        Ok(discarded)
    }

    /// Resolve every open note without any AI revision.
    pub async fn resolve_without_promotion(&self, asset_id: &AssetId) -> Result<ClearedReview, CoreError> {
        let cleared = self.state.write().await.resolve_without_promotion(asset_id)?;

        tracing::info!(
            asset_id = %asset_id,
            resolved_notes = cleared.resolved_notes.len(),
            draft_discarded = cleared.draft_discarded,
            "Review cleared without promotion",
        );
        self.emit(
            RevisionEvent::new(EVENT_REVIEW_CLEARED)
                .for_asset(asset_id)
                .with_payload(serde_json::json!({ "resolved_notes": cleared.resolved_notes })),
        );
        Ok(cleared)
    }

    pub async fn review_state(&self, asset_id: &AssetId) -> Result<ReviewState, CoreError> {
        self.state.read().await.review_state(asset_id)
    }

    // -----------------------------------------------------------------------
    // Version chain lookup
    // -----------------------------------------------------------------------

    /// Register known result locators for naming-convention lookup.
    ///
    /// Returns how many were added; colliding names are skipped.
    pub async fn register_results<I, S>(&self, locators: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.write().await;
        let mut added = 0;
        for locator in locators {
            if state.result_pool.insert(locator) {
                added += 1;
            }
        }
        added
    }

    /// The result for version `version` of an asset, if one is known.
    pub async fn resolve_version(
        &self,
        asset_id: &AssetId,
        version: VersionIndex,
    ) -> Result<Option<ResolvedResult>, CoreError> {
        let state = self.state.read().await;
        let name = state.asset(asset_id)?.original().name.clone();
        let resolver = VersionChainResolver::standard(&state.live_results, &state.result_pool);
        Ok(resolver.resolve(asset_id, &name, version))
    }

    /// Every resolvable version from 0 to the current index.
    pub async fn versions_available(&self, asset_id: &AssetId) -> Result<Vec<ResolvedResult>, CoreError> {
        let state = self.state.read().await;
        let asset = state.asset(asset_id)?;
        let resolver = VersionChainResolver::standard(&state.live_results, &state.result_pool);
        Ok(resolver.versions_available(asset_id, &asset.original().name, asset.version))
    }
}
