// POST /api/analyze (and /analyze_fallback): classify a comment.
//
// Body: {"text": "..."}. A non-string `text` is classified as its JSON text.
// Returns 400 if the body isn't a JSON object or `text` is missing/null.
// Model problems never fail the request (the dispatcher falls back to the
// keyword table); only a failure of the classification task itself is a 500.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{error, info};

use crate::output::truncate_chars;
use crate::web::{api_error, AppState};

pub const INVALID_BODY: &str = "Request body must be a JSON object";
pub const NO_TEXT: &str = "No text provided";

/// Extract the text to classify from a raw request body.
pub fn request_text(body: &[u8]) -> Result<String, &'static str> {
    let value: Value = serde_json::from_slice(body).map_err(|_| INVALID_BODY)?;
    let Value::Object(mut fields) = value else {
        return Err(INVALID_BODY);
    };
    match fields.remove("text") {
        None | Some(Value::Null) => Err(NO_TEXT),
        Some(Value::String(text)) => Ok(text),
        Some(other) => Ok(other.to_string()),
    }
}

pub async fn analyze(State(state): State<AppState>, body: Bytes) -> Response {
    let text = match request_text(&body) {
        Ok(text) => text,
        Err(message) => return api_error(StatusCode::BAD_REQUEST, message),
    };

    info!(text_preview = %truncate_chars(&text, 50), "Analyzing text");

    // Classification is CPU-bound (and may read model files), so keep it off
    // the async workers.
    let dispatcher = Arc::clone(&state.dispatcher);
    let outcome = tokio::task::spawn_blocking(move || dispatcher.classify(&text)).await;

    match outcome {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Exception in analysis");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Classification task failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Classification failed unexpectedly",
            )
        }
    }
}
