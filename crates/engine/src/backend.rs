//! Revision execution strategies.
//!
//! Both strategies sit behind [`RevisionBackend`]: given a job they
//! eventually produce the candidate result asset or an error. Neither
//! touches engine state; the dispatcher stages whatever they return.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use atelier_core::asset::{Asset, LIVE_RESULT_TAGS, SIMULATED_RESULT_TAGS};
use atelier_core::dimensions::target_dimensions;
use atelier_core::error::CoreError;
use atelier_core::generation::{GenerationRequest, RevisionGenerator};
use atelier_core::naming::versioned_name;
use atelier_core::types::{NoteId, RequestId, VersionIndex};

/// Everything a backend needs to produce one revision.
#[derive(Debug, Clone)]
pub struct RevisionJob {
    pub request_id: RequestId,
    /// State the refinement starts from (version 0 or the current one).
    pub source: Asset,
    /// Version-0 state of the same identity; result names derive from it.
    pub original: Asset,
    pub instruction: String,
    /// Version the result will carry if promoted.
    pub target_version: VersionIndex,
    /// Notes the instruction was built from.
    pub note_ids: Vec<NoteId>,
}

#[async_trait]
pub trait RevisionBackend: Send + Sync {
    async fn produce(&self, job: &RevisionJob) -> Result<Asset, CoreError>;
}

// ---------------------------------------------------------------------------
// Simulated
// ---------------------------------------------------------------------------

/// Deterministic stand-in: waits, then renames.
///
/// Version N of `hero.png` is `hero_N.png`, both for the display name and
/// for the locator.
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The result this backend yields for `job`, without the delay.
    pub fn derive(job: &RevisionJob) -> Asset {
        Asset::revision_of(
            &job.source,
            versioned_name(&job.original.name, job.target_version),
            versioned_name(&job.original.locator, job.target_version),
            job.target_version,
            SIMULATED_RESULT_TAGS,
        )
    }
}

#[async_trait]
impl RevisionBackend for SimulatedBackend {
    async fn produce(&self, job: &RevisionJob) -> Result<Asset, CoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::derive(job))
    }
}

// ---------------------------------------------------------------------------
// Live
// ---------------------------------------------------------------------------

/// Delegates to an injected [`RevisionGenerator`] with an upper time bound.
pub struct LiveBackend {
    generator: Arc<dyn RevisionGenerator>,
    timeout: Duration,
}

impl LiveBackend {
    pub fn new(generator: Arc<dyn RevisionGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }
}

#[async_trait]
impl RevisionBackend for LiveBackend {
    async fn produce(&self, job: &RevisionJob) -> Result<Asset, CoreError> {
        let request = GenerationRequest {
            source_locator: job.source.locator.clone(),
            instruction: job.instruction.clone(),
            kind: job.source.kind,
            source_name: job.source.name.clone(),
            target: match (job.source.width, job.source.height) {
                (Some(w), Some(h)) => Some(target_dimensions(w, h)),
                _ => None,
            },
        };

        let locator = match tokio::time::timeout(self.timeout, self.generator.generate(&request)).await {
            Ok(Ok(locator)) => locator,
            Ok(Err(e)) => return Err(CoreError::GenerationFailed(e.to_string())),
            Err(_) => {
                return Err(CoreError::GenerationFailed(format!(
                    "generation timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        Ok(Asset::revision_of(
            &job.source,
            versioned_name(&job.original.name, job.target_version),
            locator,
            job.target_version,
            LIVE_RESULT_TAGS,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use atelier_core::asset::{AssetKind, NewAsset};
    use atelier_core::generation::GenerationError;

    fn job() -> RevisionJob {
        let mut input = NewAsset::new("A", "A.png", "/img/A.png", AssetKind::Image);
        input.tags = vec!["Spring".into()];
        let original = Asset::ingested(input).unwrap();
        RevisionJob {
            request_id: uuid::Uuid::new_v4(),
            source: original.clone(),
            original,
            instruction: "brighten".into(),
            target_version: 1,
            note_ids: Vec::new(),
        }
    }

    struct Failing;

    #[async_trait]
    impl RevisionGenerator for Failing {
        async fn generate(&self, _: &GenerationRequest) -> Result<String, GenerationError> {
            Err(GenerationError::Other("quota exceeded".into()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl RevisionGenerator for Stalled {
        async fn generate(&self, _: &GenerationRequest) -> Result<String, GenerationError> {
            std::future::pending().await
        }
    }

    #[test]
    fn simulated_result_is_reproducible() {
        let job = job();
        let a = SimulatedBackend::derive(&job);
        let b = SimulatedBackend::derive(&job);

        assert_eq!(a.name, "A_1.png");
        assert_eq!(a.locator, "/img/A_1.png");
        assert_eq!(a.id, job.source.id);
        assert_eq!(a.tags, vec!["Spring", "AI-Modified", "Iterated"]);
        assert_eq!((a.name, a.locator), (b.name, b.locator));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_backend_waits_for_its_delay() {
        let backend = SimulatedBackend::new(Duration::from_secs(3));
        let started = tokio::time::Instant::now();
        let result = backend.produce(&job()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(result.version, 1);
    }

    #[tokio::test]
    async fn live_failure_message_is_forwarded() {
        let backend = LiveBackend::new(Arc::new(Failing), Duration::from_secs(5));
        assert_matches!(
            backend.produce(&job()).await,
            Err(CoreError::GenerationFailed(msg)) if msg == "quota exceeded"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn live_timeout_is_a_failure() {
        let backend = LiveBackend::new(Arc::new(Stalled), Duration::from_secs(120));
        assert_matches!(
            backend.produce(&job()).await,
            Err(CoreError::GenerationFailed(msg)) if msg.contains("timed out")
        );
    }
}
