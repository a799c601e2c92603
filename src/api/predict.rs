//! Prediction endpoint

use axum::extract::{multipart::MultipartError, Multipart, State};
use axum::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;
use tracing::warn;

use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiErrorType, Json};
use crate::domain::Confidence;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub confidence: Confidence,
    /// File name as declared by the client
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The uploaded part
struct Upload {
    filename: String,
    bytes: Bytes,
}

/// POST /predict
///
/// The session gate is the first extractor, so an anonymous caller is
/// redirected before the multipart body is touched.
pub async fn predict(
    RequireSession(account_id): RequireSession,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PredictionResponse>, ApiError> {
    let upload = read_upload(multipart).await?;

    let prediction = state
        .prediction_service
        .clone()
        .predict(account_id, upload.bytes.clone())
        .await?;

    let image_url = match &state.upload_sink {
        Some(sink) => match sink.persist(&upload.filename, &upload.bytes).await {
            Ok(stored) => Some(format!("/uploads/{}", stored.stored_name)),
            Err(e) => {
                warn!(account_id = %account_id, error = %e, "Failed to persist upload");
                None
            }
        },
        None => None,
    };

    Ok(Json(PredictionResponse {
        prediction: prediction.label,
        confidence: prediction.confidence,
        filename: upload.filename,
        image_url,
    }))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.is_empty() {
            return Err(ApiError::bad_request("No selected file").with_code("empty_upload"));
        }

        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::bad_request("No file part").with_code("missing_file"))
}

fn multipart_error(error: MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("Upload exceeds the size limit")
            .with_code("upload_too_large");
    }

    ApiError::new(
        error.status(),
        ApiErrorType::InvalidRequestError,
        format!("Invalid multipart body: {}", error.body_text()),
    )
    .with_code("invalid_multipart")
}
