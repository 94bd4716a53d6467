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
        .route("/api/categorias", get(handlers::list_categories_handler))
        .route("/api/categorias", post(handlers::create_category_handler))
        .route("/api/categorias/{id}", get(handlers::get_category_handler))
        .route("/api/categorias/{id}", put(handlers::update_category_handler))
        .route("/api/categorias/{id}", delete(handlers::delete_category_handler))
}
