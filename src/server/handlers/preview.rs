//! Plate preview handler.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::preview::{render_plate_png, PreviewOptions};
use crate::template::LabelTemplate;

use super::super::state::AppState;

/// Handle POST /api/preview - render one template as PNG.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(template): Json<LabelTemplate>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let template = template.clamped();
    template
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    // Rasterizing is CPU-bound, run it off the async workers
    let typeface = state.typeface.clone();
    let render_result = tokio::task::spawn_blocking(move || {
        render_plate_png(&template, &typeface, &PreviewOptions::default())
    })
    .await;

    let png_bytes = match render_result {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Preview render failed: {}", e),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Task error: {}", e),
            ));
        }
    };

    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}
