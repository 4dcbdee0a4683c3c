//! The live revision capability.
//!
//! The engine treats image/video generation as an opaque remote service:
//! given a source locator and an instruction it eventually yields a result
//! locator or an error. Implementations live outside `core` (see the
//! `atelier-genai` crate); tests inject their own.

use async_trait::async_trait;
use serde::Serialize;

use crate::asset::AssetKind;
use crate::dimensions::TargetDimensions;

/// Everything a generator may need to produce one revision.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub source_locator: String,
    pub instruction: String,
    pub kind: AssetKind,
    /// Display name of the source, forwarded as the product name.
    pub source_name: String,
    /// Output size, when the source dimensions are known.
    pub target: Option<TargetDimensions>,
}

/// Failure reported by a generator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Network, DNS, TLS, or timeout failure.
    #[error("{0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("generation service error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered successfully but returned no result.
    #[error("generation service returned no result")]
    EmptyResult,

    /// Any other failure, message forwarded verbatim.
    #[error("{0}")]
    Other(String),
}

/// Remote capability: `generate(sourceLocator, instruction) -> resultLocator`.
#[async_trait]
pub trait RevisionGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl RevisionGenerator for Echo {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            Ok(format!("{}#revised", request.source_locator))
        }
    }

    #[tokio::test]
    async fn trait_object_is_callable() {
        let generator: Box<dyn RevisionGenerator> = Box::new(Echo);
        let request = GenerationRequest {
            source_locator: "/img/a.png".into(),
            instruction: "brighten".into(),
            kind: AssetKind::Image,
            source_name: "a.png".into(),
            target: None,
        };
        assert_eq!(generator.generate(&request).await.unwrap(), "/img/a.png#revised");
    }

    #[test]
    fn error_messages_are_forwarded_verbatim() {
        assert_eq!(GenerationError::Other("quota exceeded".into()).to_string(), "quota exceeded");
        let api = GenerationError::Api { status: 503, body: "busy".into() };
        assert_eq!(api.to_string(), "generation service error (503): busy");
    }
}
