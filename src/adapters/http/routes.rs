use axum::{extract::{Multipart, State}, response::IntoResponse, Json};

use crate::adapters::http::{error::ApiError, state::HttpState};
use crate::application::dto::{DetectionResponse, HealthResponse, Upload};
use crate::domain::errors::DomainError;

pub const SERVICE_NAME: &str = "Logo Detector";

/// POST /detect: every file part of the multipart body is an upload
/// (`file`/`files` fields, or any part carrying a filename).
pub async fn detect(
    State(st): State<HttpState>,
    mut multipart: Multipart,
) -> Result<Json<DetectionResponse>, ApiError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        let is_file = field.file_name().is_some() || matches!(field.name(), Some("file" | "files"));
        if !is_file {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| DomainError::InvalidInput(format!("failed to read upload: {e}")))?;
        uploads.push(Upload { file_name, content_type, bytes: bytes.to_vec() });
    }

    let detections = st.detection.detect_uploads(uploads).await?;
    Ok(Json(DetectionResponse::from(detections.as_slice())))
}

pub async fn health(State(st): State<HttpState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        service: SERVICE_NAME.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        model: st.detection.model().onnx_path.clone(),
    })
}
