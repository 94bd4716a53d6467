pub mod handlers;
pub mod implementations;
pub mod models;
pub mod repository;
pub mod schemas;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::utilities::app_state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/usuarios", get(handlers::list_users_handler))
        .route("/api/usuarios", post(handlers::create_user_handler))
        .route("/api/usuarios/{id}", get(handlers::get_user_handler))
        .route("/api/usuarios/{id}", put(handlers::update_user_handler))
        .route("/api/usuarios/{id}", delete(handlers::delete_user_handler))
}
