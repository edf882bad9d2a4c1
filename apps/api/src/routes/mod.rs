pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::journal::handlers as journal;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::template::handlers as template;
use crate::uploads::handlers as uploads;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume store
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume).delete(resume::handle_reset_resume),
        )
        .route(
            "/api/v1/resume/path",
            axum::routing::patch(resume::handle_set_path),
        )
        .route(
            "/api/v1/resume/sections/:section",
            post(resume::handle_add_item).put(resume::handle_reorder),
        )
        .route(
            "/api/v1/resume/sections/:section/:index",
            put(resume::handle_edit_item).delete(resume::handle_remove_item),
        )
        .route(
            "/api/v1/resume/sections/:section/:index/move",
            post(resume::handle_move_item),
        )
        .route("/api/v1/resume/import", post(resume::handle_import))
        .route("/api/v1/resume/import/file", post(resume::handle_import_file))
        .route("/api/v1/resume/export", get(resume::handle_export))
        .route("/api/v1/resume/sample", post(resume::handle_load_sample))
        // Template store
        .route(
            "/api/v1/template",
            get(template::handle_get_template)
                .patch(template::handle_update_template)
                .delete(template::handle_reset_template),
        )
        .route(
            "/api/v1/template/:field",
            get(template::handle_get_field).put(template::handle_set_field),
        )
        // Journal (in-memory)
        .route(
            "/api/v1/journal",
            get(journal::handle_list_entries).post(journal::handle_create_entry),
        )
        .route(
            "/api/v1/journal/:id",
            get(journal::handle_get_entry)
                .put(journal::handle_update_entry)
                .delete(journal::handle_delete_entry),
        )
        // Uploads
        .route("/api/v1/uploads", post(uploads::handle_upload))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()) // TODO: restrict origins once the editor's host is fixed
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
