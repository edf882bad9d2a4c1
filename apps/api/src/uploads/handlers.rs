use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::StoredUpload;

/// POST /api/v1/uploads
///
/// Stores every file field of a multipart body. Non-file fields are ignored.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<StoredUpload>>), AppError> {
    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("unreadable upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation(format!("'{original_name}' is empty")));
        }
        let upload = state
            .uploads
            .save(&original_name, &bytes)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        stored.push(upload);
    }

    if stored.is_empty() {
        return Err(AppError::Validation("no file in upload".to_string()));
    }
    Ok((StatusCode::CREATED, Json(stored)))
}
