//! Model status handler

use axum::{extract::State, Json};
use serde::Serialize;

use flowguard_core::ModelSummary;

use crate::{AppState, RequestCounters};

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub dataset_path: String,
    pub model: ModelSummary,
    pub requests: RequestCounters,
}

pub async fn status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        dataset_path: state.config.dataset_path.clone(),
        model: state.context.summary(),
        requests: state.stats.snapshot(),
    })
}
