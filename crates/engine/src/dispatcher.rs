//! Revision request dispatch.
//!
//! Submission and completion are two separate critical sections with the
//! backend call between them:
//!
//! 1. [`EngineState::begin_revision`] checks the asset, selects notes,
//!    builds the instruction, and records a pending request.
//! 2. The backend runs with no lock held.
//! 3. [`EngineState::complete_revision`] writes the draft and the terminal
//!    status together, so no reader sees `completed` without a draft.

use atelier_core::asset::{Asset, AssetId};
use atelier_core::error::CoreError;
use atelier_core::prompt::build_instruction;
use atelier_core::types::{NoteId, RequestId};
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::backend::RevisionJob;
use crate::drafts::Draft;
use crate::requests::{RequestStatus, RevisionRequest, RevisionStrategy};
use crate::state::EngineState;
use crate::versions::RefineSource;

/// What the selection UI submits for one asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevisionInput {
    /// Notes to build the instruction from; stale or unknown ids are dropped.
    #[serde(default)]
    pub note_ids: Vec<NoteId>,
    /// Free text appended after (or instead of) the note list.
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub strategy: RevisionStrategy,
    #[serde(default)]
    pub source: RefineSource,
}

impl RevisionInput {
    pub fn from_notes(note_ids: Vec<NoteId>) -> Self {
        Self {
            note_ids,
            ..Self::default()
        }
    }

    pub fn from_text(instruction: impl Into<String>) -> Self {
        Self {
            instruction: Some(instruction.into()),
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: RevisionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_source(mut self, source: RefineSource) -> Self {
        self.source = source;
        self
    }
}

/// Handle to an accepted revision request.
///
/// Dropping the handle does not cancel the request: it still completes and
/// still stages its draft.
#[derive(Debug)]
pub struct RequestHandle {
    pub request_id: RequestId,
    pub asset_id: AssetId,
    completion: JoinHandle<Result<Draft, CoreError>>,
}

impl RequestHandle {
    pub(crate) fn new(
        request_id: RequestId,
        asset_id: AssetId,
        completion: JoinHandle<Result<Draft, CoreError>>,
    ) -> Self {
        Self {
            request_id,
            asset_id,
            completion,
        }
    }

    /// Wait for the request to finish and return the draft it staged.
    pub async fn wait(self) -> Result<Draft, CoreError> {
        self.completion
            .await
            .map_err(|e| CoreError::Internal(format!("Revision task failed: {e}")))?
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_finished()
    }
}

/// Per-asset outcome of a batch submission.
#[derive(Debug)]
pub struct BatchOutcome {
    pub asset_id: AssetId,
    pub result: Result<RequestHandle, CoreError>,
}

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

impl EngineState {
    /// Validate a submission and record it as pending.
    pub(crate) fn begin_revision(
        &mut self,
        asset_id: &AssetId,
        input: &RevisionInput,
    ) -> Result<(RevisionJob, RevisionRequest), CoreError> {
        let canonical = self.asset(asset_id)?;
        if self.requests.is_busy(asset_id) {
            return Err(CoreError::AssetBusy {
                asset_id: asset_id.to_string(),
            });
        }

        let notes = self.ledger.select_for_submission(asset_id, &input.note_ids);
        let instruction = build_instruction(&notes, input.instruction.as_deref())?;

        let current = self
            .versions
            .current(asset_id)
            .ok_or_else(|| CoreError::Internal(format!("Asset {asset_id} has no version counter")))?;
        let source_version = self.versions.source_version(asset_id, input.source)?;
        let original = canonical.original().snapshot();
        let source = match input.source {
            RefineSource::Original => original.clone(),
            RefineSource::Latest => canonical.snapshot(),
        };

        let request = RevisionRequest {
            id: uuid::Uuid::new_v4(),
            source_asset_id: asset_id.clone(),
            source_version,
            instruction: instruction.clone(),
            strategy: input.strategy,
            note_ids: notes.iter().map(|n| n.id).collect(),
            status: RequestStatus::Pending,
            submitted_at: chrono::Utc::now(),
            finished_at: None,
        };
        let job = RevisionJob {
            request_id: request.id,
            source,
            original,
            instruction,
            target_version: current + 1,
            note_ids: request.note_ids.clone(),
        };

        self.requests.begin(request.clone())?;
        Ok((job, request))
    }

    /// Record the backend's outcome for `job`.
    ///
    /// A request abandoned while running (its asset was deleted) stages
    /// nothing and reports a conflict.
    pub(crate) fn complete_revision(
        &mut self,
        job: &RevisionJob,
        outcome: Result<Asset, CoreError>,
    ) -> Result<Draft, CoreError> {
        if !self.requests.is_pending(&job.request_id) {
            return Err(CoreError::Conflict(format!(
                "Asset {} was deleted before its revision completed",
                job.source.id
            )));
        }

        match outcome {
            Ok(result_asset) => {
                let draft = Draft {
                    source_asset_id: job.source.id.clone(),
                    result_asset,
                    staged_at: chrono::Utc::now(),
                    request_id: job.request_id,
                    source_version: job.source.version,
                    note_ids: job.note_ids.clone(),
                };
                self.drafts.put(draft.clone());
                self.requests
                    .finish(&job.request_id, RequestStatus::Completed);
                Ok(draft)
            }
            Err(e) => {
                let error = match &e {
                    CoreError::GenerationFailed(message) => message.clone(),
                    other => other.to_string(),
                };
                self.requests
                    .finish(&job.request_id, RequestStatus::Failed { error });
                Err(e)
            }
        }
    }
}
