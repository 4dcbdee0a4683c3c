/// Domain error shared by every Atelier crate.
///
/// The first four variants are the revision workflow's own taxonomy; the
/// rest are generic entity and input failures. Every operation that returns
/// one of these leaves engine state exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Annotation geometry was degenerate, out of range, or below the
    /// minimum drag size.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// A revision request is already pending for this asset.
    #[error("Asset {asset_id} already has a revision in progress")]
    AssetBusy { asset_id: String },

    /// Promotion was attempted with nothing in the draft stage.
    #[error("No draft staged for asset {asset_id}")]
    NoDraftStaged { asset_id: String },

    /// The live generation capability failed; the message is forwarded as-is.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing asset.
    pub fn asset_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Asset",
            id: id.into(),
        }
    }

    /// Shorthand for a missing annotation note.
    pub fn note_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Note",
            id: id.to_string(),
        }
    }
}
