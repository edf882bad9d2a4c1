use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::journal::{JournalEntry, JournalFields};
use crate::state::AppState;

/// GET /api/v1/journal
pub async fn handle_list_entries(State(state): State<AppState>) -> Json<Vec<JournalEntry>> {
    Json(state.journal.list())
}

/// POST /api/v1/journal
pub async fn handle_create_entry(
    State(state): State<AppState>,
    Json(fields): Json<JournalFields>,
) -> (StatusCode, Json<JournalEntry>) {
    (StatusCode::CREATED, Json(state.journal.create(fields)))
}

/// GET /api/v1/journal/:id
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JournalEntry>, AppError> {
    state
        .journal
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Journal entry {id} not found")))
}

/// PUT /api/v1/journal/:id
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<JournalFields>,
) -> Result<Json<JournalEntry>, AppError> {
    state
        .journal
        .update(id, fields)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Journal entry {id} not found")))
}

/// DELETE /api/v1/journal/:id
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.journal.delete(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Journal entry {id} not found")))
    }
}
