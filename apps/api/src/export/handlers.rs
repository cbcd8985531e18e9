use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::export::{generate, GenerateOutcome};
use crate::state::AppState;
use crate::validation::handlers::ValidationReport;

/// POST /api/v1/draft/generate
///
/// 422 with the error map when any submit rule fails, otherwise the export receipt.
pub async fn handle_generate(State(state): State<AppState>) -> Result<Response, AppError> {
    let snapshot = state.store.snapshot();
    match generate(&snapshot, state.exporter.as_ref()).await? {
        GenerateOutcome::Invalid(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationReport::from(errors)),
        )
            .into_response()),
        GenerateOutcome::Exported(receipt) => Ok(Json(receipt).into_response()),
    }
}
