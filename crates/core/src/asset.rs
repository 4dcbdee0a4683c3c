//! Revisable asset representation and identity.
//!
//! An [`Asset`] is the canonical state of one identity in the collection.
//! Its `history` holds the snapshots it superseded, newest first, and can
//! only be extended through [`Asset::supersede`], which the promotion
//! workflow calls. There is no other mutator.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hashing::sha256_hex;
use crate::types::{Timestamp, VersionIndex};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an asset identity string.
pub const MAX_ID_LENGTH: usize = 512;

/// Maximum length of a display name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum number of tags an asset may carry.
pub const MAX_TAGS: usize = 32;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 64;

/// Tags appended to a simulated revision result.
pub const SIMULATED_RESULT_TAGS: &[&str] = &["AI-Modified", "Iterated"];

/// Tags appended to a live revision result.
pub const LIVE_RESULT_TAGS: &[&str] = &["AI-Live", "AI-Refined"];

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable identity of an asset across annotations, drafts, and versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a content-addressed identity from raw bytes (or a locator).
    pub fn content_addressed(content: &[u8]) -> Self {
        Self(format!("sha256:{}", sha256_hex(content)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// Canonical state of a revisable item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// URI or blob reference to the binary content.
    pub locator: String,
    pub kind: AssetKind,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    /// Accepted-revision index this state represents.
    pub version: VersionIndex,
    pub width: Option<u32>,
    pub height: Option<u32>,
    history: Vec<Asset>,
}

impl Asset {
    /// Build the version-0 asset from validated ingestion input.
    pub fn ingested(input: NewAsset) -> Result<Self, CoreError> {
        input.validate()?;
        let id = match input.id {
            Some(id) => AssetId::new(id),
            None => AssetId::content_addressed(input.locator.as_bytes()),
        };
        Ok(Self {
            id,
            name: input.name,
            locator: input.locator,
            kind: input.kind,
            tags: input.tags,
            created_at: input.created_at.unwrap_or_else(chrono::Utc::now),
            version: 0,
            width: input.width,
            height: input.height,
            history: Vec::new(),
        })
    }

    /// Build a candidate result for `source` at `version`.
    ///
    /// The candidate keeps the source identity, kind, and dimensions, and
    /// starts with an empty history: history is attached at promotion.
    pub fn revision_of(
        source: &Asset,
        name: String,
        locator: String,
        version: VersionIndex,
        extra_tags: &[&str],
    ) -> Self {
        let mut tags = source.tags.clone();
        for tag in extra_tags {
            if !tags.iter().any(|t| t == tag) {
                tags.push((*tag).to_string());
            }
        }
        Self {
            id: source.id.clone(),
            name,
            locator,
            kind: source.kind,
            tags,
            created_at: chrono::Utc::now(),
            version,
            width: source.width,
            height: source.height,
            history: Vec::new(),
        }
    }

    /// Superseded states, newest first.
    pub fn history(&self) -> &[Asset] {
        &self.history
    }

    /// Copy of this state without its history, as stored in a successor's
    /// history list.
    pub fn snapshot(&self) -> Asset {
        Asset {
            history: Vec::new(),
            ..self.clone()
        }
    }

    /// Make `self` the successor of `prior`.
    ///
    /// The successor's history becomes `prior` followed by everything
    /// `prior` had already superseded.
    pub fn supersede(mut self, prior: Asset) -> Asset {
        let mut history = Vec::with_capacity(prior.history.len() + 1);
        history.push(prior.snapshot());
        history.extend(prior.history);
        self.history = history;
        self
    }

    /// The version-0 state of this identity (the oldest snapshot, or self).
    pub fn original(&self) -> &Asset {
        self.history.last().unwrap_or(self)
    }
}

// ---------------------------------------------------------------------------
// Ingestion input
// ---------------------------------------------------------------------------

/// Asset payload supplied by the upload / CRUD collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAsset {
    /// Explicit identity. When absent the locator is content-addressed.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub locator: String,
    pub kind: AssetKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl NewAsset {
    /// Convenience constructor used by tests and collaborators that only
    /// know the essentials.
    pub fn new(id: &str, name: &str, locator: &str, kind: AssetKind) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
            locator: locator.to_string(),
            kind,
            tags: Vec::new(),
            created_at: None,
            width: None,
            height: None,
        }
    }

    /// Validate identity, name, locator, tags, and dimensions.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(id) = &self.id {
            if id.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Asset id must not be empty".to_string(),
                ));
            }
            if id.len() > MAX_ID_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Asset id exceeds {MAX_ID_LENGTH} characters"
                )));
            }
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Asset name must not be empty".to_string(),
            ));
        }
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Asset name exceeds {MAX_NAME_LENGTH} characters"
            )));
        }
        if self.locator.trim().is_empty() {
            return Err(CoreError::Validation(
                "Asset locator must not be empty".to_string(),
            ));
        }
        validate_tags(&self.tags)?;
        if self.width == Some(0) || self.height == Some(0) {
            return Err(CoreError::Validation(
                "Asset dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validate a tag list against count and length limits.
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "Too many tags: {} (max {MAX_TAGS})",
            tags.len()
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".to_string()));
        }
        if tag.len() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "Tag '{tag}' exceeds {MAX_TAG_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ingest(id: &str) -> Asset {
        Asset::ingested(NewAsset::new(id, &format!("{id}.png"), &format!("/img/{id}.png"), AssetKind::Image))
            .unwrap()
    }

    #[test]
    fn ingested_asset_starts_at_version_zero() {
        let asset = ingest("A");
        assert_eq!(asset.version, 0);
        assert!(asset.history().is_empty());
        assert_eq!(asset.original().id, asset.id);
    }

    #[test]
    fn missing_id_is_content_addressed() {
        let mut input = NewAsset::new("x", "hero.png", "/img/hero.png", AssetKind::Image);
        input.id = None;
        let a = Asset::ingested(input.clone()).unwrap();
        let b = Asset::ingested(input).unwrap();
        assert!(a.id.as_str().starts_with("sha256:"));
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn empty_name_rejected() {
        let input = NewAsset::new("A", "  ", "/img/a.png", AssetKind::Image);
        assert_matches!(Asset::ingested(input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_locator_rejected() {
        let input = NewAsset::new("A", "a.png", "", AssetKind::Image);
        assert_matches!(input.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn zero_dimension_rejected() {
        let mut input = NewAsset::new("A", "a.png", "/a.png", AssetKind::Image);
        input.width = Some(0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn too_many_tags_rejected() {
        let tags: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn long_tag_rejected() {
        assert!(validate_tags(&["x".repeat(MAX_TAG_LENGTH + 1)]).is_err());
    }

    #[test]
    fn revision_keeps_identity_and_appends_tags_once() {
        let mut source = ingest("A");
        source.tags = vec!["AI-Modified".into(), "promo".into()];
        let draft = Asset::revision_of(
            &source,
            "A_1.png".into(),
            "/img/A_1.png".into(),
            1,
            SIMULATED_RESULT_TAGS,
        );
        assert_eq!(draft.id, source.id);
        assert_eq!(draft.version, 1);
        assert_eq!(draft.tags, vec!["AI-Modified", "promo", "Iterated"]);
    }

    #[test]
    fn supersede_carries_prior_history_forward() {
        let v0 = ingest("A");
        let v1 = Asset::revision_of(&v0, "A_1.png".into(), "/A_1.png".into(), 1, &[]).supersede(v0.clone());
        let v2 = Asset::revision_of(&v1, "A_2.png".into(), "/A_2.png".into(), 2, &[]).supersede(v1.clone());

        let versions: Vec<u32> = v2.history().iter().map(|a| a.version).collect();
        assert_eq!(versions, vec![1, 0]);
        // Snapshots are flat.
        assert!(v2.history().iter().all(|a| a.history().is_empty()));
        assert_eq!(v2.original().version, 0);
        assert_eq!(v2.original().locator, "/img/A.png");
    }

    #[test]
    fn asset_id_borrows_as_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(AssetId::from("A"), 1);
        assert_eq!(map.get("A"), Some(&1));
    }
}
