//! Promotion workflow: promote, discard, and resolve-without-promotion.
//!
//! Per asset under review:
//!
//! ```text
//!            add note / stage draft
//!   Idle ──────────────────────────▶ Reviewing
//!                                     │     │
//!                           promote   │     │ resolve without promotion
//!                                     ▼     ▼
//!                               Promoted   Cleared
//! ```
//!
//! `Promoted` and `Cleared` end a cycle. A new note starts the next one.

use std::str::FromStr;

use atelier_core::asset::{Asset, AssetId};
use atelier_core::error::CoreError;
use atelier_core::types::{NoteId, VersionIndex};
use serde::{Deserialize, Serialize};

use crate::drafts::Draft;
use crate::state::EngineState;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Which notes a promotion resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    /// Every unresolved note on the asset: accepting a draft answers all
    /// outstanding feedback.
    #[default]
    ResolveAll,
    /// Only the notes the promoted draft's request was built from.
    ResolveSubmitted,
}

impl FromStr for PromotionPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resolve_all" => Ok(Self::ResolveAll),
            "resolve_submitted" => Ok(Self::ResolveSubmitted),
            other => Err(CoreError::Validation(format!(
                "Unknown promotion policy '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Review state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// No open notes, no draft, no request, and no finished cycle.
    Idle,
    /// Open notes, a staged draft, or a pending request.
    Reviewing,
    Promoted,
    Cleared,
}

/// How a finished review cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReviewOutcome {
    Promoted,
    Cleared,
}

/// Result of a successful promotion.
#[derive(Debug, Clone, Serialize)]
pub struct Promotion {
    /// The new canonical asset, history attached.
    pub asset: Asset,
    pub previous_version: VersionIndex,
    pub resolved_notes: Vec<NoteId>,
}

/// Result of resolving a review without promotion.
#[derive(Debug, Clone, Serialize)]
pub struct ClearedReview {
    pub asset_id: AssetId,
    pub resolved_notes: Vec<NoteId>,
    /// Whether a staged draft was dropped as part of clearing.
    pub draft_discarded: bool,
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

impl EngineState {
    /// Accept the staged draft for `asset_id` as its new canonical state.
    ///
    /// Checks run first: unknown asset, pending request, and missing draft
    /// all fail before anything changes. The mutations that follow cannot
    /// fail.
    pub(crate) fn promote(
        &mut self,
        asset_id: &AssetId,
        policy: PromotionPolicy,
    ) -> Result<Promotion, CoreError> {
        self.asset(asset_id)?;
        if self.requests.is_busy(asset_id) {
            return Err(CoreError::AssetBusy {
                asset_id: asset_id.to_string(),
            });
        }
        let previous_version = self
            .versions
            .current(asset_id)
            .ok_or_else(|| CoreError::Internal(format!("Asset {asset_id} has no version counter")))?;
        let Some(draft) = self.drafts.clear(asset_id) else {
            return Err(CoreError::NoDraftStaged {
                asset_id: asset_id.to_string(),
            });
        };

        let resolved_notes = match policy {
            PromotionPolicy::ResolveAll => self.ledger.resolve_all(asset_id),
            PromotionPolicy::ResolveSubmitted => self.ledger.resolve_many(&draft.note_ids),
        };

        let version = self.versions.advance(asset_id)?;
        let mut result = draft.result_asset;
        result.version = version;
        self.live_results
            .record(asset_id, version, result.locator.clone());

        let asset = match self.canonical.get_mut(asset_id) {
            Some(slot) => {
                let prior = slot.clone();
                *slot = result.supersede(prior);
                slot.clone()
            }
            None => return Err(CoreError::asset_not_found(asset_id.as_str())),
        };
        self.outcomes.insert(asset_id.clone(), ReviewOutcome::Promoted);

        Ok(Promotion {
            asset,
            previous_version,
            resolved_notes,
        })
    }

    /// Drop the staged draft. Notes, canonical asset, and version stay.
    ///
    /// Returns the dropped draft, or `None` when nothing was staged.
    pub(crate) fn discard(&mut self, asset_id: &AssetId) -> Result<Option<Draft>, CoreError> {
        self.asset(asset_id)?;
        Ok(self.drafts.clear(asset_id))
    }

    /// Resolve every open note directly, ending the cycle as `Cleared`.
    ///
    /// A draft still staged for the asset is dropped with it.
    pub(crate) fn resolve_without_promotion(
        &mut self,
        asset_id: &AssetId,
    ) -> Result<ClearedReview, CoreError> {
        self.asset(asset_id)?;
        let resolved_notes = self.ledger.resolve_all(asset_id);
        let draft_discarded = self.drafts.clear(asset_id).is_some();
        self.outcomes.insert(asset_id.clone(), ReviewOutcome::Cleared);
        Ok(ClearedReview {
            asset_id: asset_id.clone(),
            resolved_notes,
            draft_discarded,
        })
    }

    pub(crate) fn review_state(&self, asset_id: &AssetId) -> Result<ReviewState, CoreError> {
        self.asset(asset_id)?;
        if self.is_under_review(asset_id) {
            return Ok(ReviewState::Reviewing);
        }
        Ok(match self.outcomes.get(asset_id) {
            Some(ReviewOutcome::Promoted) => ReviewState::Promoted,
            Some(ReviewOutcome::Cleared) => ReviewState::Cleared,
            None => ReviewState::Idle,
        })
    }

    pub(crate) fn is_under_review(&self, asset_id: &AssetId) -> bool {
        self.ledger.active_count(asset_id) > 0
            || self.drafts.get(asset_id).is_some()
            || self.requests.is_busy(asset_id)
    }
}
