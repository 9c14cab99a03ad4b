//! Prediction endpoint - image upload and robust inference
//!
//! Accepts a multipart image upload, persists it to the upload directory,
//! and runs the robust predictor. The three outcome states (Success,
//! Unsure, Invalid) all return 200 with a `status` tag; only transport
//! problems (bad upload, undecodable image) are HTTP errors.

use std::path::PathBuf;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use leafguard::inference::PredictionOutcome;
use leafguard::utils::error::LeafguardError;

use crate::state::SharedState;

/// File extensions accepted for upload
const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Multipart field name carrying the image
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// POST /predict - Upload an image and classify it
pub async fn predict(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<PredictionOutcome>, ApiError> {
    // Find the image field.
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Malformed multipart request: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(bad_request("No file selected"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(&format!("Failed to read upload: {}", e)))?;

        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| bad_request("No file uploaded"))?;

    let extension = PathBuf::from(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(bad_request(
            "Unsupported file type. Please upload a PNG or JPEG image.",
        ));
    }

    // Persist under a fresh name so concurrent uploads never collide.
    let upload_dir = state.config.upload_dir.clone();
    tokio::fs::create_dir_all(&upload_dir).await.map_err(|e| {
        error!("Failed to create upload directory: {}", e);
        internal_error("Failed to store upload")
    })?;

    let stored_path = upload_dir.join(format!("{}.{}", Uuid::new_v4(), extension));
    tokio::fs::write(&stored_path, &bytes).await.map_err(|e| {
        error!("Failed to write upload: {}", e);
        internal_error("Failed to store upload")
    })?;

    info!("Stored upload {:?} ({} bytes)", stored_path, bytes.len());

    // The forward pass is synchronous CPU work; keep it off the async
    // executor threads.
    let worker_state = state.clone();
    let worker_path = stored_path.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        worker_state.predictor.predict_path(&worker_path)
    })
    .await
    .map_err(|e| {
        error!("Prediction task panicked: {}", e);
        internal_error("Prediction failed")
    })?
    .map_err(|e| match e {
        LeafguardError::Decode(path, reason) => {
            info!("Undecodable upload {:?}: {}", path, reason);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    error: "The uploaded file could not be decoded as an image".to_string(),
                }),
            )
        }
        other => {
            error!("Prediction failed: {}", other);
            internal_error("Prediction failed")
        }
    })?;

    info!(
        "Prediction: {} ({})",
        outcome.status(),
        outcome.confidence_percent()
    );

    Ok(Json(outcome))
}
