//! HTTP client for the generate-learning endpoint
//!
//! One call per request, no retries. Content is checked locally before any
//! network traffic, and a client refuses to start a second call while one is
//! still pending.

use super::parse::parse_generation_output;
use super::types::{ArtifactKind, ErrorBody, GenerationRequest, GenerationResult};
use crate::config::ClientConfig;
use crate::error::{validate_content, Error, Result};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Client for the generation service
#[derive(Clone)]
pub struct GenerationClient {
    endpoint: String,
    default_count: u32,
    http: reqwest::Client,
    in_flight: Arc<AtomicBool>,
}

/// Releases the in-flight flag when the call finishes or is dropped
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::GenerationInProgress)?;
        Ok(Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl GenerationClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            default_count: config.default_count.max(1),
            http,
            in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Endpoint this client posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a generation call is currently pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Generate with the configured default question count
    pub async fn generate(&self, content: &str, kind: ArtifactKind) -> Result<GenerationResult> {
        self.generate_with_count(content, kind, self.default_count)
            .await
    }

    /// Generate learning data for `content`
    pub async fn generate_with_count(
        &self,
        content: &str,
        kind: ArtifactKind,
        count: u32,
    ) -> Result<GenerationResult> {
        let content = validate_content(content)?;
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let request = GenerationRequest::new(content, kind, count);
        tracing::info!(
            kind = %kind,
            count = request.count,
            chars = content.chars().count(),
            "Requesting learning artifacts"
        );

        let result = self.send(&request).await;
        match &result {
            Ok(r) => tracing::info!(
                questions = r.questions().len(),
                concepts = r.concepts().len(),
                "Generation succeeded"
            ),
            Err(e) => tracing::warn!(error = %e, "Generation failed"),
        }
        result
    }

    /// Like [`generate_with_count`](Self::generate_with_count), aborting with
    /// [`Error::Cancelled`] when `cancel` fires first
    pub async fn generate_cancellable(
        &self,
        content: &str,
        kind: ArtifactKind,
        count: u32,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult> {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Generation cancelled by caller");
                Err(Error::Cancelled)
            }
            result = self.generate_with_count(content, kind, count) => result,
        }
    }

    async fn send(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(Error::RateLimited),
            StatusCode::PAYMENT_REQUIRED => return Err(Error::PaymentRequired),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .map(|b| b.error)
                    .unwrap_or(body);
                return Err(Error::ServiceUnavailable(format!("HTTP {}: {}", s, message)));
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ServiceUnavailable(e.to_string()))?;
        let result =
            parse_generation_output(&body, request.question_cap())?.retain_kind(request.kind);

        // The requested field must carry data, not just any field
        match request.kind {
            ArtifactKind::Quiz if result.questions().is_empty() => Err(Error::NoQuestionsFound),
            ArtifactKind::Memory if result.concepts().is_empty() => Err(Error::NoConceptsFound),
            ArtifactKind::All if result.is_empty() => Err(Error::NoConceptsFound),
            _ => Ok(result),
        }
    }
}
