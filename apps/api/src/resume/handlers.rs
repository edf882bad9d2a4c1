//! Axum route handlers for the resume store.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::resume::{ResumeDocument, Section};
use crate::resume::collection::{Direction, SectionItem, SectionItems};
use crate::resume::import::ImportSource;
use crate::resume::path::Patch;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetPathRequest {
    pub path: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub item: Value,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub items: Value,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

fn parse_section(raw: &str) -> Result<Section, AppError> {
    raw.parse::<Section>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn invalid_item(section: Section) -> impl FnOnce(serde_json::Error) -> AppError {
    move |e| AppError::Validation(format!("invalid {section} entry: {e}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.resume.get())
}

/// DELETE /api/v1/resume
///
/// Resets the resume to the empty default document.
pub async fn handle_reset_resume(
    State(state): State<AppState>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.with_resume(|store| store.reset()).await?))
}

/// PATCH /api/v1/resume/path
pub async fn handle_set_path(
    State(state): State<AppState>,
    Json(req): Json<SetPathRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let patch = Patch::from_json(&req.path, req.value)?;
    Ok(Json(state.with_resume(move |store| store.set_path(patch)).await?))
}

/// POST /api/v1/resume/sections/:section
pub async fn handle_add_item(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let section = parse_section(&section)?;
    let item = SectionItem::from_json(section, req.item).map_err(invalid_item(section))?;
    Ok(Json(state.with_resume(move |store| store.add_item(item)).await?))
}

/// PUT /api/v1/resume/sections/:section
///
/// Replaces the section with the given, already ordered, entries.
pub async fn handle_reorder(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let section = parse_section(&section)?;
    let items = SectionItems::from_json(section, req.items).map_err(invalid_item(section))?;
    Ok(Json(state.with_resume(move |store| store.reorder(items)).await?))
}

/// PUT /api/v1/resume/sections/:section/:index
pub async fn handle_edit_item(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
    Json(req): Json<ItemRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let section = parse_section(&section)?;
    let item = SectionItem::from_json(section, req.item).map_err(invalid_item(section))?;
    Ok(Json(state.with_resume(move |store| store.edit_item(index, item)).await?))
}

/// DELETE /api/v1/resume/sections/:section/:index
pub async fn handle_remove_item(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Json<ResumeDocument>, AppError> {
    let section = parse_section(&section)?;
    let doc = state
        .with_resume(move |store| store.remove_item(section, index))
        .await?;
    Ok(Json(doc))
}

/// POST /api/v1/resume/sections/:section/:index/move
pub async fn handle_move_item(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let section = parse_section(&section)?;
    let direction = req.direction;
    let doc = state
        .with_resume(move |store| store.move_item(section, index, direction))
        .await?;
    Ok(Json(doc))
}

/// POST /api/v1/resume/import
///
/// Imports an already-parsed resume object.
pub async fn handle_import(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.with_resume(move |store| store.import(ImportSource::Json(body))).await?))
}

/// POST /api/v1/resume/import/file
///
/// Imports the first file field of a multipart upload.
pub async fn handle_import_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeDocument>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("unreadable import file: {e}")))?;
        let doc = state
            .with_resume(move |store| store.import(ImportSource::Text(text)))
            .await?;
        return Ok(Json(doc));
    }
    Err(AppError::Validation("no file in upload".to_string()))
}

/// GET /api/v1/resume/export
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.resume.export().map_err(|e| AppError::Internal(e.into()))?;
    Ok((
        [(header::CONTENT_DISPOSITION, "attachment; filename=\"resume.json\"")],
        Json(body),
    ))
}

/// POST /api/v1/resume/sample
pub async fn handle_load_sample(
    State(state): State<AppState>,
) -> Result<Json<ResumeDocument>, AppError> {
    let pending = state.resume.fetch_sample(state.sample.as_ref()).await?;
    let doc = state
        .with_resume(move |store| store.apply_sample(pending))
        .await?;
    Ok(Json(doc))
}
