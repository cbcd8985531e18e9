use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::{FieldPath, ImageSlot, ResumeDraft, RowList, SetField, MAX_ROWS};
use crate::errors::{AppError, AppJson};
use crate::state::AppState;
use crate::store::ingest::UploadedFile;
use crate::store::{Ingestion, UpdateOutcome};

#[derive(Deserialize)]
pub struct FieldUpdate {
    pub path: FieldPath,
    pub value: Value,
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub item: String,
}

/// Outcome of a synchronous mutation plus the snapshot it left behind.
#[derive(Serialize)]
pub struct MutationResponse {
    pub applied: bool,
    pub draft: Arc<ResumeDraft>,
}

#[derive(Serialize)]
pub struct UploadAccepted {
    pub slot: ImageSlot,
    pub status: &'static str,
}

fn respond(state: &AppState, outcome: UpdateOutcome) -> Json<MutationResponse> {
    Json(MutationResponse {
        applied: outcome.applied(),
        draft: state.store.snapshot(),
    })
}

fn parse_slot(slot: &str) -> Result<ImageSlot, AppError> {
    ImageSlot::parse(slot).ok_or_else(|| AppError::Validation(format!("Unknown image slot '{slot}'")))
}

/// GET /api/v1/draft
pub async fn handle_get_draft(State(state): State<AppState>) -> Json<Arc<ResumeDraft>> {
    Json(state.store.snapshot())
}

/// PATCH /api/v1/draft/field
pub async fn handle_update_field(
    State(state): State<AppState>,
    AppJson(req): AppJson<FieldUpdate>,
) -> Json<MutationResponse> {
    let outcome = state.store.update(&req.path, &req.value);
    respond(&state, outcome)
}

/// POST /api/v1/draft/sets/:set/toggle
pub async fn handle_toggle_member(
    State(state): State<AppState>,
    Path(set): Path<String>,
    AppJson(req): AppJson<ToggleRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let field = SetField::parse(&set)
        .ok_or_else(|| AppError::Validation(format!("Unknown set field '{set}'")))?;
    let item = req.item.trim();
    if item.is_empty() {
        return Err(AppError::Validation("Item must not be blank".to_string()));
    }
    let outcome = state.store.toggle_set_member(field, item);
    Ok(respond(&state, outcome))
}

/// POST /api/v1/draft/rows/:list
pub async fn handle_append_row(
    State(state): State<AppState>,
    Path(list): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let list = RowList::parse(&list)
        .ok_or_else(|| AppError::Validation(format!("Unknown row list '{list}'")))?;
    let outcome = state.store.append_row(list, MAX_ROWS);
    Ok(respond(&state, outcome))
}

/// POST /api/v1/draft/images/:slot
///
/// Accepts a multipart body with a `file` part. Decoding continues after the
/// response is sent; poll the draft to observe the result. A body without a
/// `file` part clears the slot.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadAccepted>), AppError> {
    let slot = parse_slot(&slot)?;
    let mut multipart = multipart?;

    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        file = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    match state.store.ingest_file(slot, file)? {
        // The handle is dropped; the decode task keeps running detached.
        Ingestion::Decoding(_) => Ok((
            StatusCode::ACCEPTED,
            Json(UploadAccepted {
                slot,
                status: "decoding",
            }),
        )),
        Ingestion::Cleared(_) => Ok((
            StatusCode::OK,
            Json(UploadAccepted {
                slot,
                status: "cleared",
            }),
        )),
    }
}

/// DELETE /api/v1/draft/images/:slot
pub async fn handle_clear_image(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let slot = parse_slot(&slot)?;
    let outcome = match state.store.ingest_file(slot, None)? {
        Ingestion::Cleared(outcome) => outcome,
        Ingestion::Decoding(_) => UpdateOutcome::Ignored,
    };
    Ok(respond(&state, outcome))
}
