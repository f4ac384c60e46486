//! HTTP handler for the generate-learning endpoint
//!
//! - POST /functions/v1/generate-learning: content in, questions/concepts out

use super::prompt::build_prompt;
use super::provider::CompletionProvider;
use crate::error::{validate_content, Error};
use crate::generation::{parse_generation_output, ErrorBody, GenerationRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Route of the generation endpoint
pub const GENERATE_PATH: &str = "/functions/v1/generate-learning";

/// Shared state for generation handlers
#[derive(Clone)]
pub struct GenerationState {
    pub provider: Arc<dyn CompletionProvider>,
}

impl GenerationState {
    /// Wrap a provider
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

/// Create the generation router
pub fn generation_router(state: GenerationState) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_learning))
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a provider failure onto the status/body pair the client expects
fn provider_error_response(err: &Error) -> Response {
    match err {
        Error::RateLimited => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limits exceeded, please try later.",
        ),
        Error::PaymentRequired => error_response(
            StatusCode::PAYMENT_REQUIRED,
            "Payment required, please add funds to your AI workspace.",
        ),
        Error::Config(msg) => error_response(StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, "AI gateway error"),
    }
}

/// POST /functions/v1/generate-learning
async fn generate_learning(
    State(state): State<GenerationState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected generation request body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    if validate_content(&request.content).is_err() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Content missing or too short (min 50 chars).",
        );
    }

    tracing::info!(
        kind = %request.kind,
        count = request.count,
        provider = state.provider.name(),
        "Generating learning data"
    );

    let prompt = build_prompt(&request);
    let raw = match state.provider.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Upstream generation failed");
            return provider_error_response(&e);
        }
    };

    match parse_generation_output(&raw, request.question_cap()) {
        Ok(result) => {
            let result = result.retain_kind(request.kind);
            tracing::info!(
                questions = result.questions().len(),
                concepts = result.concepts().len(),
                "Generated learning data"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Model returned unusable output");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "AI returned invalid JSON")
        }
    }
}
