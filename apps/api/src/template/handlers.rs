//! Axum route handlers for template preferences.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::template::{TemplateField, TemplatePreferences};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetFieldRequest {
    pub value: String,
}

fn parse_field(raw: &str) -> Result<TemplateField, AppError> {
    raw.parse::<TemplateField>()
        .map_err(|e| AppError::NotFound(e.to_string()))
}

/// GET /api/v1/template
pub async fn handle_get_template(State(state): State<AppState>) -> Json<TemplatePreferences> {
    Json(state.template.get())
}

/// PATCH /api/v1/template
///
/// Body: an object of preference name → string value. Unknown names are rejected.
pub async fn handle_update_template(
    State(state): State<AppState>,
    Json(body): Json<BTreeMap<String, Value>>,
) -> Result<Json<TemplatePreferences>, AppError> {
    let changes = body
        .into_iter()
        .map(|(key, value)| {
            let field = key
                .parse::<TemplateField>()
                .map_err(|e| AppError::Validation(e.to_string()))?;
            match value {
                Value::String(s) => Ok((field, s)),
                _ => Err(AppError::Validation(format!("'{key}' must be a string"))),
            }
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(state.with_template(move |store| store.update(changes)).await?))
}

/// DELETE /api/v1/template
pub async fn handle_reset_template(
    State(state): State<AppState>,
) -> Result<Json<TemplatePreferences>, AppError> {
    Ok(Json(state.with_template(|store| store.reset()).await?))
}

/// GET /api/v1/template/:field
pub async fn handle_get_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Result<Json<Value>, AppError> {
    let field = parse_field(&field)?;
    let prefs = state.template.get();
    Ok(Json(json!({ "field": field.as_str(), "value": prefs.get(field) })))
}

/// PUT /api/v1/template/:field
pub async fn handle_set_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(req): Json<SetFieldRequest>,
) -> Result<Json<TemplatePreferences>, AppError> {
    let field = parse_field(&field)?;
    Ok(Json(state.with_template(move |store| store.set(field, req.value)).await?))
}
