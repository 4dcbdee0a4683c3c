//! Draft stage: at most one unaccepted candidate per source asset.

use std::collections::HashMap;

use atelier_core::asset::{Asset, AssetId};
use atelier_core::types::{NoteId, RequestId, Timestamp, VersionIndex};
use serde::Serialize;

/// A completed revision waiting for promote or discard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    pub source_asset_id: AssetId,
    pub result_asset: Asset,
    pub staged_at: Timestamp,
    /// Request that produced this draft.
    pub request_id: RequestId,
    /// Version the request was refined from.
    pub source_version: VersionIndex,
    /// Notes the request's instruction was built from.
    pub note_ids: Vec<NoteId>,
}

#[derive(Debug, Default)]
pub struct DraftStage {
    drafts: HashMap<AssetId, Draft>,
}

impl DraftStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source_asset_id: &AssetId) -> Option<&Draft> {
        self.drafts.get(source_asset_id)
    }

    /// Stage `draft`, returning the one it replaced.
    pub fn put(&mut self, draft: Draft) -> Option<Draft> {
        self.drafts.insert(draft.source_asset_id.clone(), draft)
    }

    pub fn clear(&mut self, source_asset_id: &AssetId) -> Option<Draft> {
        self.drafts.remove(source_asset_id)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
