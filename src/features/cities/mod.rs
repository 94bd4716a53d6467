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
        .route("/api/cidades", get(handlers::list_cities_handler))
        .route("/api/cidades", post(handlers::create_city_handler))
        .route("/api/cidades/{id}", get(handlers::get_city_handler))
        .route("/api/cidades/{id}", put(handlers::update_city_handler))
        .route("/api/cidades/{id}", delete(handlers::delete_city_handler))
}
