pub mod handlers;
pub mod implementations;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use crate::{services::uploads::UploadSettings, utilities::app_state::AppState};

pub fn routes(uploads: &UploadSettings) -> Router<AppState> {
    Router::new()
        .route("/api/imoveis/{id}/fotos", get(handlers::list_photos_handler))
        .route(
            "/api/imoveis/{id}/fotos",
            post(handlers::create_photos_handler)
                .layer(DefaultBodyLimit::max(uploads.body_limit())),
        )
        .route(
            "/api/imoveis/{id}/fotos/{foto_id}",
            delete(handlers::delete_photo_handler),
        )
}
