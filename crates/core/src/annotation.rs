//! Spatial annotation geometry and note validation.
//!
//! Regions are normalized rectangles in `[0,1] x [0,1]` produced by a
//! draw-and-annotate gesture. A gesture whose extent is below the minimum
//! drag threshold in both axes is an accidental click, not a note.

use serde::{Deserialize, Serialize};

use crate::asset::AssetId;
use crate::error::CoreError;
use crate::types::{NoteId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default minimum drag extent (normalized units) for a gesture to count.
pub const DEFAULT_MIN_DRAG: f64 = 0.004;

/// Maximum length of a note's text.
pub const MAX_NOTE_TEXT_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A normalized point, used as the pin position of a note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Normalized rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Region {
    /// Build a region from two arbitrary drag corners.
    ///
    /// Corner order is normalized, so dragging up-left works the same as
    /// dragging down-right.
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64, min_drag: f64) -> Result<Self, CoreError> {
        let region = Self {
            x1: ax.min(bx),
            y1: ay.min(by),
            x2: ax.max(bx),
            y2: ay.max(by),
        };
        region.validate(min_drag)?;
        Ok(region)
    }

    /// Check range, ordering, and minimum size.
    pub fn validate(&self, min_drag: f64) -> Result<(), CoreError> {
        let coords = [self.x1, self.y1, self.x2, self.y2];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(CoreError::InvalidRegion(
                "coordinates must be finite numbers".to_string(),
            ));
        }
        if coords.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(CoreError::InvalidRegion(format!(
                "coordinates must lie in [0, 1], got ({}, {}, {}, {})",
                self.x1, self.y1, self.x2, self.y2
            )));
        }
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(CoreError::InvalidRegion(
                "expected x1 <= x2 and y1 <= y2".to_string(),
            ));
        }
        let (w, h) = (self.width(), self.height());
        if w < min_drag && h < min_drag {
            return Err(CoreError::InvalidRegion(format!(
                "drag of {w:.4} x {h:.4} is below the minimum of {min_drag}"
            )));
        }
        if w == 0.0 || h == 0.0 {
            return Err(CoreError::InvalidRegion(
                "region has zero area".to_string(),
            ));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Centroid of the rectangle.
    pub fn anchor(&self) -> Point {
        Point {
            x: self.x1 + self.width() / 2.0,
            y: self.y1 + self.height() / 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// Spatially anchored feedback on an asset.
///
/// Notes are never edited after creation; only `resolved` flips, and only
/// from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub asset_id: AssetId,
    pub region: Region,
    pub anchor: Point,
    pub text: String,
    pub resolved: bool,
    pub created_at: Timestamp,
}

impl Note {
    /// Validate inputs and create an unresolved note.
    pub fn new(asset_id: AssetId, region: Region, text: &str, min_drag: f64) -> Result<Self, CoreError> {
        region.validate(min_drag)?;
        let text = validate_note_text(text)?;
        Ok(Self {
            id: uuid::Uuid::new_v4(),
            asset_id,
            anchor: region.anchor(),
            region,
            text,
            resolved: false,
            created_at: chrono::Utc::now(),
        })
    }
}

/// Trim and validate note text, returning the trimmed value.
pub fn validate_note_text(text: &str) -> Result<String, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Note text must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NOTE_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Note text exceeds maximum length of {MAX_NOTE_TEXT_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn corners_are_normalized() {
        let r = Region::from_corners(0.3, 0.4, 0.1, 0.2, DEFAULT_MIN_DRAG).unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn anchor_is_centroid() {
        let r = Region::from_corners(0.1, 0.1, 0.3, 0.3, DEFAULT_MIN_DRAG).unwrap();
        let p = r.anchor();
        assert!((p.x - 0.2).abs() < 1e-12);
        assert!((p.y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn click_below_threshold_rejected() {
        let res = Region::from_corners(0.5, 0.5, 0.501, 0.502, DEFAULT_MIN_DRAG);
        assert_matches!(res, Err(CoreError::InvalidRegion(_)));
    }

    #[test]
    fn thin_but_long_drag_accepted() {
        // Narrow in one axis, well above threshold in the other.
        assert!(Region::from_corners(0.1, 0.5, 0.6, 0.502, DEFAULT_MIN_DRAG).is_ok());
    }

    #[test]
    fn zero_area_rejected() {
        let res = Region::from_corners(0.1, 0.5, 0.6, 0.5, DEFAULT_MIN_DRAG);
        assert_matches!(res, Err(CoreError::InvalidRegion(_)));
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(Region::from_corners(-0.1, 0.0, 0.5, 0.5, DEFAULT_MIN_DRAG).is_err());
        assert!(Region::from_corners(0.0, 0.0, 1.2, 0.5, DEFAULT_MIN_DRAG).is_err());
    }

    #[test]
    fn nan_rejected() {
        assert!(Region::from_corners(f64::NAN, 0.0, 0.5, 0.5, DEFAULT_MIN_DRAG).is_err());
    }

    #[test]
    fn unordered_deserialized_region_rejected() {
        let r = Region { x1: 0.5, y1: 0.1, x2: 0.2, y2: 0.4 };
        assert_matches!(r.validate(DEFAULT_MIN_DRAG), Err(CoreError::InvalidRegion(_)));
    }

    #[test]
    fn note_trims_text_and_starts_unresolved() {
        let region = Region::from_corners(0.1, 0.1, 0.3, 0.3, DEFAULT_MIN_DRAG).unwrap();
        let note = Note::new(AssetId::from("A"), region, "  brighten  ", DEFAULT_MIN_DRAG).unwrap();
        assert_eq!(note.text, "brighten");
        assert!(!note.resolved);
        assert_eq!(note.anchor, region.anchor());
    }

    #[test]
    fn blank_note_text_rejected() {
        assert_matches!(validate_note_text("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn overlong_note_text_rejected() {
        let text = "x".repeat(MAX_NOTE_TEXT_LENGTH + 1);
        assert!(validate_note_text(&text).is_err());
    }
}
