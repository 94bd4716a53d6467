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
        .route("/api/imoveis", get(handlers::list_properties_handler))
        .route("/api/imoveis", post(handlers::create_property_handler))
        .route("/api/imoveis/{id}", get(handlers::get_property_handler))
        .route("/api/imoveis/{id}", put(handlers::update_property_handler))
        .route("/api/imoveis/{id}", delete(handlers::delete_property_handler))
}
