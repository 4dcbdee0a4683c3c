//! Event type names published on the event bus by the revision engine.
//!
//! Consumers (the HTTP surface's event log, future WebSocket push) match on
//! these strings rather than on engine internals.

pub const EVENT_ASSET_INGESTED: &str = "asset.ingested";
pub const EVENT_ASSET_DELETED: &str = "asset.deleted";

pub const EVENT_NOTE_ADDED: &str = "note.added";
pub const EVENT_NOTE_RESOLVED: &str = "note.resolved";

/// A revision request was accepted and is now pending.
pub const EVENT_REVISION_SUBMITTED: &str = "revision.submitted";

/// A revision request completed and its result was staged as a draft.
pub const EVENT_REVISION_COMPLETED: &str = "revision.completed";

/// A revision request failed; the draft stage was left untouched.
pub const EVENT_REVISION_FAILED: &str = "revision.failed";

pub const EVENT_DRAFT_PROMOTED: &str = "draft.promoted";
pub const EVENT_DRAFT_DISCARDED: &str = "draft.discarded";

/// All notes were resolved without promoting a draft.
pub const EVENT_REVIEW_CLEARED: &str = "review.cleared";
