//! Classification handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use flowguard_core::{FlowRecord, FlowReport};

use crate::{AppError, AppState, AppResult};
use crate::models::{ClassifyRequest, ClassifyResponse, ExamplesResponse};

/// Classify one flow record
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> AppResult<Json<ClassifyResponse>> {
    // Malformed bodies (negative counts, unknown protocol) share the 400 path
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            state.stats.record_rejected();
            tracing::debug!("Rejected flow body: {}", rejection.body_text());
            return Err(AppError::ValidationError(rejection.body_text()));
        }
    };

    if let Err(e) = req.validate() {
        state.stats.record_rejected();
        tracing::debug!("Rejected flow input: {}", e);
        return Err(e.into());
    }

    let record = FlowRecord::from(req);
    let result = match state.context.classify(&record) {
        Ok(result) => result,
        Err(e) => {
            state.stats.record_rejected();
            return Err(e.into());
        }
    };

    state.stats.record(result.is_anomaly);

    if result.is_anomaly {
        tracing::info!(
            "Anomaly: {} {}->{} score={:.3} reasons={:?}",
            record.protocol,
            record.source_port,
            record.destination_port,
            result.anomaly_score,
            result.reasons
        );
    }

    let report = FlowReport::new(&record, &result);

    Ok(Json(ClassifyResponse { record, result, report }))
}

/// Suggested normal and anomalous patterns
pub async fn examples() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        normal: FlowRecord::normal_example(),
        anomalous: FlowRecord::anomalous_example(),
    })
}
