/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier of an annotation note.
pub type NoteId = uuid::Uuid;

/// Identifier of a revision request.
pub type RequestId = uuid::Uuid;

/// Accepted-revision counter for an asset identity. `0` is the ingested original.
pub type VersionIndex = u32;
