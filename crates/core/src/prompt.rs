//! Revision instruction building.
//!
//! Selected notes become a numbered change list under a fixed preamble
//! that tells the generator to leave everything else untouched.

use crate::annotation::Note;
use crate::error::CoreError;

/// Preamble placed before the numbered change list.
pub const INSTRUCTION_PREAMBLE: &str =
    "Keep everything intact and do not touch anything else; just apply the following changes:";

/// Maximum length of the free-text part of an instruction.
pub const MAX_FREE_TEXT_LENGTH: usize = 4_000;

/// Build the instruction sent with a revision request.
///
/// - Notes are listed in the given order as `1- text`, `2- text`, ...
/// - Free text, when present, is appended as its own paragraph.
/// - With no notes, the instruction is the free text alone.
///
/// Fails when both inputs are empty.
pub fn build_instruction(notes: &[Note], free_text: Option<&str>) -> Result<String, CoreError> {
    let free = free_text.map(str::trim).filter(|t| !t.is_empty());

    if let Some(text) = free {
        if text.chars().count() > MAX_FREE_TEXT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Instruction exceeds maximum length of {MAX_FREE_TEXT_LENGTH} characters"
            )));
        }
    }

    match (notes.is_empty(), free) {
        (true, None) => Err(CoreError::Validation(
            "A revision needs at least one open note or an instruction".to_string(),
        )),
        (true, Some(text)) => Ok(text.to_string()),
        (false, free) => {
            let list = notes
                .iter()
                .enumerate()
                .map(|(i, n)| format!("{}- {}", i + 1, n.text))
                .collect::<Vec<_>>()
                .join("\n");
            let mut out = format!("{INSTRUCTION_PREAMBLE}\n{list}");
            if let Some(text) = free {
                out.push_str("\n\n");
                out.push_str(text);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Region, DEFAULT_MIN_DRAG};
    use crate::asset::AssetId;

    fn note(text: &str) -> Note {
        let region = Region::from_corners(0.1, 0.1, 0.3, 0.3, DEFAULT_MIN_DRAG).unwrap();
        Note::new(AssetId::from("A"), region, text, DEFAULT_MIN_DRAG).unwrap()
    }

    #[test]
    fn numbered_list_under_preamble() {
        let out = build_instruction(&[note("brighten"), note("remove logo")], None).unwrap();
        assert_eq!(
            out,
            format!("{INSTRUCTION_PREAMBLE}\n1- brighten\n2- remove logo")
        );
    }

    #[test]
    fn free_text_only() {
        let out = build_instruction(&[], Some("  warmer tones ")).unwrap();
        assert_eq!(out, "warmer tones");
    }

    #[test]
    fn notes_and_free_text() {
        let out = build_instruction(&[note("brighten")], Some("keep the crop")).unwrap();
        assert!(out.ends_with("1- brighten\n\nkeep the crop"));
    }

    #[test]
    fn nothing_to_submit_rejected() {
        assert!(build_instruction(&[], None).is_err());
        assert!(build_instruction(&[], Some("   ")).is_err());
    }

    #[test]
    fn overlong_free_text_rejected() {
        let text = "x".repeat(MAX_FREE_TEXT_LENGTH + 1);
        assert!(build_instruction(&[], Some(&text)).is_err());
    }
}
