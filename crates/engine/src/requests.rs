//! Revision request table and the per-asset in-flight guard.

use std::collections::HashMap;
use std::str::FromStr;

use atelier_core::asset::AssetId;
use atelier_core::error::CoreError;
use atelier_core::types::{NoteId, RequestId, Timestamp, VersionIndex};
use serde::{Deserialize, Serialize};

/// Execution strategy of a revision request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionStrategy {
    #[default]
    Simulated,
    Live,
}

impl RevisionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Live => "live",
        }
    }
}

impl FromStr for RevisionStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simulated" => Ok(Self::Simulated),
            "live" => Ok(Self::Live),
            other => Err(CoreError::Validation(format!(
                "Unknown strategy '{other}', expected simulated or live"
            ))),
        }
    }
}

/// `pending -> completed | failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Completed,
    Failed { error: String },
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionRequest {
    pub id: RequestId,
    pub source_asset_id: AssetId,
    pub source_version: VersionIndex,
    pub instruction: String,
    pub strategy: RevisionStrategy,
    pub note_ids: Vec<NoteId>,
    #[serde(flatten)]
    pub status: RequestStatus,
    pub submitted_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

#[derive(Debug, Default)]
pub struct RequestTable {
    requests: HashMap<RequestId, RevisionRequest>,
    /// Pending request per asset.
    in_flight: HashMap<AssetId, RequestId>,
    /// Most recent request per asset, pending or not.
    latest: HashMap<AssetId, RequestId>,
}

impl RequestTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, asset_id: &AssetId) -> bool {
        self.in_flight.contains_key(asset_id)
    }

    /// Record a new pending request. Fails with `AssetBusy` when one is
    /// already pending for the same asset.
    pub fn begin(&mut self, request: RevisionRequest) -> Result<(), CoreError> {
        if self.is_busy(&request.source_asset_id) {
            return Err(CoreError::AssetBusy {
                asset_id: request.source_asset_id.to_string(),
            });
        }
        self.in_flight
            .insert(request.source_asset_id.clone(), request.id);
        self.latest
            .insert(request.source_asset_id.clone(), request.id);
        self.requests.insert(request.id, request);
        Ok(())
    }

    /// Move a pending request to a terminal status and release its asset.
    ///
    /// Returns `None` if the request is unknown or no longer pending.
    pub fn finish(&mut self, request_id: &RequestId, status: RequestStatus) -> Option<&RevisionRequest> {
        let request = self.requests.get_mut(request_id)?;
        if !request.status.is_pending() {
            return None;
        }
        request.status = status;
        request.finished_at = Some(chrono::Utc::now());
        if self.in_flight.get(&request.source_asset_id) == Some(request_id) {
            self.in_flight.remove(&request.source_asset_id);
        }
        Some(request)
    }

    pub fn get(&self, request_id: &RequestId) -> Option<&RevisionRequest> {
        self.requests.get(request_id)
    }

    pub fn is_pending(&self, request_id: &RequestId) -> bool {
        self.requests
            .get(request_id)
            .is_some_and(|r| r.status.is_pending())
    }

    /// Most recent request for an asset.
    pub fn latest_for(&self, asset_id: &AssetId) -> Option<&RevisionRequest> {
        self.latest
            .get(asset_id)
            .and_then(|id| self.requests.get(id))
    }

    /// Fail any pending request for a deleted asset and forget the asset.
    pub fn abandon(&mut self, asset_id: &AssetId) -> Option<RequestId> {
        let pending = self.in_flight.get(asset_id).copied();
        if let Some(id) = pending {
            self.finish(
                &id,
                RequestStatus::Failed {
                    error: format!("Asset {asset_id} was deleted"),
                },
            );
        }
        self.latest.remove(asset_id);
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(asset: &str) -> RevisionRequest {
        RevisionRequest {
            id: uuid::Uuid::new_v4(),
            source_asset_id: AssetId::from(asset),
            source_version: 0,
            instruction: "brighten".into(),
            strategy: RevisionStrategy::Simulated,
            note_ids: Vec::new(),
            status: RequestStatus::Pending,
            submitted_at: chrono::Utc::now(),
            finished_at: None,
        }
    }

    #[test]
    fn second_request_for_same_asset_is_busy() {
        let mut table = RequestTable::new();
        let first = request("A");
        let first_id = first.id;
        table.begin(first).unwrap();

        assert_matches!(
            table.begin(request("A")),
            Err(CoreError::AssetBusy { asset_id }) if asset_id == "A"
        );
        assert!(table.begin(request("B")).is_ok());
        assert_eq!(table.latest_for(&AssetId::from("A")).unwrap().id, first_id);
    }

    #[test]
    fn finish_releases_the_asset_once() {
        let mut table = RequestTable::new();
        let req = request("A");
        let id = req.id;
        table.begin(req).unwrap();

        assert!(table.finish(&id, RequestStatus::Completed).is_some());
        assert!(!table.is_busy(&AssetId::from("A")));
        assert!(table.finish(&id, RequestStatus::Completed).is_none());
        assert!(table.get(&id).unwrap().finished_at.is_some());
    }

    #[test]
    fn abandon_fails_the_pending_request() {
        let mut table = RequestTable::new();
        let req = request("A");
        let id = req.id;
        table.begin(req).unwrap();

        assert_eq!(table.abandon(&AssetId::from("A")), Some(id));
        assert_matches!(table.get(&id).unwrap().status, RequestStatus::Failed { .. });
        assert!(table.latest_for(&AssetId::from("A")).is_none());
        assert!(!table.is_pending(&id));
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_value(RequestStatus::Failed { error: "boom".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed", "error": "boom"}));
    }
}
