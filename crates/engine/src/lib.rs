//! Asset revision and versioning engine.
//!
//! Owns the canonical asset collection, the annotation ledger, the draft
//! stage, per-asset version counters, and the request table. Revision
//! results never reach the canonical collection except through
//! [`RevisionEngine::promote`].

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod drafts;
pub mod engine;
pub mod ledger;
pub mod lookup;
pub mod promotion;
pub mod requests;
mod state;
pub mod versions;

pub use config::EngineConfig;
pub use dispatcher::{BatchOutcome, RequestHandle, RevisionInput};
pub use drafts::Draft;
pub use engine::{PreviewVariant, RevisionEngine};
pub use lookup::{ResolvedResult, ResultOrigin};
pub use promotion::{ClearedReview, Promotion, PromotionPolicy, ReviewState};
pub use requests::{RequestStatus, RevisionRequest, RevisionStrategy};
pub use versions::RefineSource;
