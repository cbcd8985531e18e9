use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;
use crate::validation::{compute_field_hints, validate, ErrorKey, ErrorMap, FieldHints};

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// The field the form should focus, in form order.
    pub first_error: Option<ErrorKey>,
    pub errors: ErrorMap,
}

impl From<ErrorMap> for ValidationReport {
    fn from(errors: ErrorMap) -> Self {
        Self {
            valid: errors.is_empty(),
            first_error: errors.first_error(),
            errors,
        }
    }
}

/// GET /api/v1/draft/validation
pub async fn handle_validate(State(state): State<AppState>) -> Json<ValidationReport> {
    Json(validate(&state.store.snapshot()).into())
}

/// GET /api/v1/draft/hints
pub async fn handle_hints(State(state): State<AppState>) -> Json<FieldHints> {
    Json(compute_field_hints(&state.store.snapshot()))
}
