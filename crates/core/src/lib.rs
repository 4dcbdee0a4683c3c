//! Atelier core domain library.
//!
//! Zero-I/O building blocks shared by the revision engine, the live
//! generation client, and the HTTP surface: asset identity, annotation
//! geometry, instruction building, naming conventions, output sizing, the
//! live generation capability trait, and the shared error taxonomy.

pub mod annotation;
pub mod asset;
pub mod dimensions;
pub mod error;
pub mod generation;
pub mod hashing;
pub mod naming;
pub mod prompt;
pub mod revision_events;
pub mod types;
