//! REST client for the generation service.
//!
//! Images go to `POST /generate-card`, videos to `POST /generate-video`.
//! Both answer with JSON carrying the result location.

use std::time::Duration;

use async_trait::async_trait;
use atelier_core::asset::AssetKind;
use atelier_core::dimensions::TargetDimensions;
use atelier_core::generation::{GenerationError, GenerationRequest, RevisionGenerator};
use serde::{Deserialize, Serialize};

use crate::config::{GenerationConfig, DEFAULT_SERVER_VERSION};

/// Resolution tier requested for generated images.
const IMAGE_RESOLUTION: &str = "1K";

/// HTTP client for one generation service instance.
pub struct GenerationApi {
    client: reqwest::Client,
    api_url: String,
    server_version: String,
}

/// Body of `POST /generate-card`.
#[derive(Debug, Serialize)]
struct CardRequest<'a> {
    image_path: &'a str,
    product_name: &'a str,
    server_version: &'a str,
    custom_prompt: &'a str,
    n: u32,
    width: u32,
    height: u32,
    resolution: &'a str,
}

#[derive(Debug, Deserialize)]
struct CardResponse {
    #[serde(default)]
    images: Vec<String>,
}

/// Body of `POST /generate-video`.
#[derive(Debug, Serialize)]
struct VideoRequest<'a> {
    image_path: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct VideoResponse {
    #[serde(default)]
    video: Option<String>,
}

/// Errors from the generation REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GenerationApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Generation API error ({status}): {body}")]
    ApiError {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response without a result location.
    #[error("Generation API returned no result")]
    EmptyResult,
}

impl From<GenerationApiError> for GenerationError {
    fn from(err: GenerationApiError) -> Self {
        match err {
            GenerationApiError::Request(e) => GenerationError::Transport(e.to_string()),
            GenerationApiError::ApiError { status, body } => GenerationError::Api { status, body },
            GenerationApiError::EmptyResult => GenerationError::EmptyResult,
        }
    }
}

impl GenerationApi {
    /// * `api_url` - Base HTTP URL, e.g. `http://host:5000`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            server_version: DEFAULT_SERVER_VERSION.to_string(),
        }
    }

    /// Build a client from configuration. Returns `None` when no URL is set.
    pub fn from_config(config: &GenerationConfig) -> Result<Option<Self>, GenerationApiError> {
        let Some(api_url) = &config.api_url else {
            return Ok(None);
        };
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Some(Self {
            client,
            api_url: api_url.clone(),
            server_version: config.server_version.clone(),
        }))
    }

    pub fn with_timeout(api_url: String, timeout: Duration) -> Result<Self, GenerationApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            server_version: DEFAULT_SERVER_VERSION.to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Generate a revised image; returns the location of the first image.
    pub async fn generate_card(
        &self,
        image_path: &str,
        product_name: &str,
        prompt: &str,
        target: TargetDimensions,
    ) -> Result<String, GenerationApiError> {
        let body = CardRequest {
            image_path,
            product_name,
            server_version: &self.server_version,
            custom_prompt: prompt,
            n: 1,
            width: target.width,
            height: target.height,
            resolution: IMAGE_RESOLUTION,
        };

        let response = self
            .client
            .post(format!("{}/generate-card", self.api_url))
            .json(&body)
            .send()
            .await?;

        let parsed: CardResponse = Self::parse_response(response).await?;
        parsed
            .images
            .into_iter()
            .next()
            .filter(|url| !url.is_empty())
            .ok_or(GenerationApiError::EmptyResult)
    }

    /// Generate a video from a still; returns the video location.
    pub async fn generate_video(&self, image_path: &str, prompt: &str) -> Result<String, GenerationApiError> {
        let response = self
            .client
            .post(format!("{}/generate-video", self.api_url))
            .json(&VideoRequest { image_path, prompt })
            .send()
            .await?;

        let parsed: VideoResponse = Self::parse_response(response).await?;
        parsed
            .video
            .filter(|url| !url.is_empty())
            .ok_or(GenerationApiError::EmptyResult)
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GenerationApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenerationApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RevisionGenerator for GenerationApi {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        tracing::debug!(
            kind = request.kind.as_str(),
            source = %request.source_locator,
            "Calling generation service",
        );
        let result = match request.kind {
            AssetKind::Image => {
                self.generate_card(
                    &request.source_locator,
                    &request.source_name,
                    &request.instruction,
                    request.target.unwrap_or_default(),
                )
                .await
            }
            AssetKind::Video => {
                self.generate_video(&request.source_locator, &request.instruction)
                    .await
            }
        };
        result.map_err(|e| {
            tracing::warn!(error = %e, "Generation service call failed");
            GenerationError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_request_matches_wire_format() {
        let body = CardRequest {
            image_path: "/img/a.png",
            product_name: "a.png",
            server_version: "v2",
            custom_prompt: "brighten",
            n: 1,
            width: 1024,
            height: 1024,
            resolution: IMAGE_RESOLUTION,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "image_path": "/img/a.png",
                "product_name": "a.png",
                "server_version": "v2",
                "custom_prompt": "brighten",
                "n": 1,
                "width": 1024,
                "height": 1024,
                "resolution": "1K",
            })
        );
    }

    #[test]
    fn api_errors_map_to_generation_errors() {
        let err = GenerationError::from(GenerationApiError::ApiError {
            status: 500,
            body: "boom".into(),
        });
        assert_eq!(err, GenerationError::Api { status: 500, body: "boom".into() });
        assert_eq!(
            GenerationError::from(GenerationApiError::EmptyResult),
            GenerationError::EmptyResult
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(GenerationApi::new("http://gen:5000/".into()).api_url(), "http://gen:5000");
    }
}
