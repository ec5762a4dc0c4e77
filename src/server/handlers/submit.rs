//! Submission handler: validate, render, store, notify.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::PlacaError;
use crate::submission::{self, RequestMeta, SubmissionRequest};

use super::super::state::AppState;

/// Handle POST /api/nameplates - accept a submission.
///
/// The raw JSON body is kept alongside the parsed request because the
/// webhook forwards the client payload as-is, envelope aside.
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    let Some(notifier) = state.notifier.clone() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server not configured");
    };

    let request: SubmissionRequest = match serde_json::from_value(payload.clone()) {
        Ok(request) => request,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid submission: {}", e),
            );
        }
    };

    if let Err(e) = submission::validate_request(&request) {
        return error_response(StatusCode::BAD_REQUEST, &e.to_string());
    }

    let meta = RequestMeta {
        user_agent: header_str(&headers, header::USER_AGENT),
        referer: header_str(&headers, header::REFERER),
    };

    // Thumbnails plus the table PDF are CPU-bound, render off the async workers
    let typeface = state.typeface.clone();
    let render_request = request.clone();
    let render_result = tokio::task::spawn_blocking(move || {
        submission::render_submission_summary(&render_request, &typeface)
    })
    .await;

    let pdf = match render_result {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Summary render failed: {}", e),
            );
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Task error: {}", e),
            );
        }
    };

    match submission::store_and_notify(
        state.storage.as_ref(),
        notifier.as_ref(),
        &request,
        payload,
        &meta,
        pdf,
    )
    .await
    {
        Ok(summary_url) => (
            StatusCode::OK,
            Json(json!({"ok": true, "summary_url": summary_url})),
        )
            .into_response(),
        Err(PlacaError::WebhookRejected { status, body }) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": "Webhook rejected", "status": status, "body": body})),
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}
