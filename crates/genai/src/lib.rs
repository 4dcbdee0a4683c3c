//! HTTP client for the remote image/video generation service.
//!
//! [`GenerationApi`] is the production [`RevisionGenerator`] behind the
//! engine's live strategy.
//!
//! [`RevisionGenerator`]: atelier_core::generation::RevisionGenerator

pub mod api;
pub mod config;

pub use api::{GenerationApi, GenerationApiError};
pub use config::GenerationConfig;
