//! Annotation ledger.
//!
//! Notes are append-only: after creation the only mutation is flipping
//! `resolved` to `true`. The number of unresolved notes on an asset is the
//! sole "pending review" signal.

use std::collections::{HashMap, HashSet};

use atelier_core::annotation::{Note, Region};
use atelier_core::asset::AssetId;
use atelier_core::error::CoreError;
use atelier_core::types::NoteId;

#[derive(Debug, Default)]
pub struct AnnotationLedger {
    notes: HashMap<NoteId, Note>,
    /// Note ids per asset, in creation order.
    by_asset: HashMap<AssetId, Vec<NoteId>>,
}

impl AnnotationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a new unresolved note.
    pub fn add_note(
        &mut self,
        asset_id: &AssetId,
        region: Region,
        text: &str,
        min_drag: f64,
    ) -> Result<Note, CoreError> {
        let note = Note::new(asset_id.clone(), region, text, min_drag)?;
        self.by_asset
            .entry(asset_id.clone())
            .or_default()
            .push(note.id);
        self.notes.insert(note.id, note.clone());
        Ok(note)
    }

    pub fn get(&self, note_id: &NoteId) -> Option<&Note> {
        self.notes.get(note_id)
    }

    /// Mark a note resolved.
    ///
    /// Returns `true` when the note flipped, `false` when it was already
    /// resolved.
    pub fn resolve(&mut self, note_id: &NoteId) -> Result<bool, CoreError> {
        let note = self
            .notes
            .get_mut(note_id)
            .ok_or_else(|| CoreError::note_not_found(note_id))?;
        if note.resolved {
            return Ok(false);
        }
        note.resolved = true;
        Ok(true)
    }

    /// Resolve every unresolved note on `asset_id`; returns the ids flipped.
    pub fn resolve_all(&mut self, asset_id: &AssetId) -> Vec<NoteId> {
        let ids = self.by_asset.get(asset_id).cloned().unwrap_or_default();
        self.resolve_many(&ids)
    }

    /// Resolve the given notes; unknown or already resolved ids are skipped.
    pub fn resolve_many(&mut self, note_ids: &[NoteId]) -> Vec<NoteId> {
        let mut flipped = Vec::new();
        for id in note_ids {
            if let Some(note) = self.notes.get_mut(id) {
                if !note.resolved {
                    note.resolved = true;
                    flipped.push(*id);
                }
            }
        }
        flipped
    }

    pub fn active_count(&self, asset_id: &AssetId) -> usize {
        self.by_asset.get(asset_id).map_or(0, |ids| {
            ids.iter()
                .filter_map(|id| self.notes.get(id))
                .filter(|note| !note.resolved)
                .count()
        })
    }

    /// All notes on an asset, resolved included, in creation order.
    pub fn notes_for(&self, asset_id: &AssetId) -> Vec<Note> {
        self.by_asset.get(asset_id).map_or_else(Vec::new, |ids| {
            ids.iter()
                .filter_map(|id| self.notes.get(id))
                .cloned()
                .collect()
        })
    }

    /// Unresolved notes on `asset_id` whose ids appear in `note_ids`.
    ///
    /// Resolved, unknown, duplicate, and foreign-asset ids are dropped
    /// silently. The result follows the asset's creation order, not the
    /// order of `note_ids`.
    pub fn select_for_submission(&self, asset_id: &AssetId, note_ids: &[NoteId]) -> Vec<Note> {
        let wanted: HashSet<&NoteId> = note_ids.iter().collect();
        self.by_asset.get(asset_id).map_or_else(Vec::new, |ids| {
            ids.iter()
                .filter(|id| wanted.contains(id))
                .filter_map(|id| self.notes.get(id))
                .filter(|note| !note.resolved)
                .cloned()
                .collect()
        })
    }

    /// Drop every note attached to `asset_id`. Returns how many were removed.
    pub fn purge(&mut self, asset_id: &AssetId) -> usize {
        let ids = self.by_asset.remove(asset_id).unwrap_or_default();
        for id in &ids {
            self.notes.remove(id);
        }
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use atelier_core::annotation::DEFAULT_MIN_DRAG;

    fn region() -> Region {
        Region::from_corners(0.1, 0.1, 0.3, 0.3, DEFAULT_MIN_DRAG).unwrap()
    }

    fn asset(id: &str) -> AssetId {
        AssetId::from(id)
    }

    #[test]
    fn add_note_counts_as_active() {
        let mut ledger = AnnotationLedger::new();
        let note = ledger
            .add_note(&asset("A"), region(), "brighten", DEFAULT_MIN_DRAG)
            .unwrap();

        assert!(!note.resolved);
        assert_eq!(ledger.active_count(&asset("A")), 1);
        assert_eq!(ledger.active_count(&asset("B")), 0);
    }

    #[test]
    fn empty_text_is_rejected_without_recording() {
        let mut ledger = AnnotationLedger::new();
        let result = ledger.add_note(&asset("A"), region(), "   ", DEFAULT_MIN_DRAG);

        assert_matches!(result, Err(CoreError::Validation(_)));
        assert!(ledger.notes_for(&asset("A")).is_empty());
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut ledger = AnnotationLedger::new();
        let note = ledger
            .add_note(&asset("A"), region(), "crop", DEFAULT_MIN_DRAG)
            .unwrap();

        assert!(ledger.resolve(&note.id).unwrap());
        assert!(!ledger.resolve(&note.id).unwrap());
        assert_eq!(ledger.active_count(&asset("A")), 0);
        assert!(ledger.get(&note.id).unwrap().resolved);
    }

    #[test]
    fn resolve_unknown_note_is_not_found() {
        let mut ledger = AnnotationLedger::new();
        assert_matches!(
            ledger.resolve(&uuid::Uuid::new_v4()),
            Err(CoreError::NotFound { entity: "Note", .. })
        );
    }

    #[test]
    fn select_drops_resolved_unknown_and_foreign_ids() {
        let mut ledger = AnnotationLedger::new();
        let a1 = ledger.add_note(&asset("A"), region(), "one", DEFAULT_MIN_DRAG).unwrap();
        let a2 = ledger.add_note(&asset("A"), region(), "two", DEFAULT_MIN_DRAG).unwrap();
        let a3 = ledger.add_note(&asset("A"), region(), "three", DEFAULT_MIN_DRAG).unwrap();
        let b1 = ledger.add_note(&asset("B"), region(), "other", DEFAULT_MIN_DRAG).unwrap();
        ledger.resolve(&a2.id).unwrap();

        let selected = ledger.select_for_submission(
            &asset("A"),
            &[a3.id, a2.id, uuid::Uuid::new_v4(), b1.id, a1.id, a1.id],
        );

        let texts: Vec<&str> = selected.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "three"]);
    }

    #[test]
    fn resolve_all_flips_only_unresolved() {
        let mut ledger = AnnotationLedger::new();
        let n1 = ledger.add_note(&asset("A"), region(), "one", DEFAULT_MIN_DRAG).unwrap();
        let n2 = ledger.add_note(&asset("A"), region(), "two", DEFAULT_MIN_DRAG).unwrap();
        ledger.resolve(&n1.id).unwrap();

        assert_eq!(ledger.resolve_all(&asset("A")), vec![n2.id]);
        assert_eq!(ledger.active_count(&asset("A")), 0);
    }

    #[test]
    fn purge_removes_notes_of_one_asset() {
        let mut ledger = AnnotationLedger::new();
        let a = ledger.add_note(&asset("A"), region(), "one", DEFAULT_MIN_DRAG).unwrap();
        ledger.add_note(&asset("B"), region(), "two", DEFAULT_MIN_DRAG).unwrap();

        assert_eq!(ledger.purge(&asset("A")), 1);
        assert!(ledger.get(&a.id).is_none());
        assert_eq!(ledger.active_count(&asset("B")), 1);
    }
}
