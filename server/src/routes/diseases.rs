//! Knowledge base browse endpoints
//!
//! Unlike the predictor's fallback path, the browse API reports a plain 404
//! for a class with no record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use leafguard::knowledge::DiseaseRecord;

use crate::state::SharedState;

/// GET /classes - List the classifier's class names in index order
pub async fn list_classes(State(state): State<SharedState>) -> Json<Vec<String>> {
    let names = state
        .predictor
        .labels()
        .names()
        .map(str::to_string)
        .collect();
    Json(names)
}

/// GET /diseases/:class - Get the disease record for a class name
pub async fn get_disease(
    State(state): State<SharedState>,
    Path(class): Path<String>,
) -> Result<Json<DiseaseRecord>, (StatusCode, String)> {
    state
        .predictor
        .knowledge()
        .get(&class)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("no disease record for class '{}'", class),
            )
        })
}
