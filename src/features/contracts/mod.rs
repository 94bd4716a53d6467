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
        .route("/api/contratos", get(handlers::list_contracts_handler))
        .route("/api/contratos", post(handlers::create_contract_handler))
        .route("/api/contratos/{id}", get(handlers::get_contract_handler))
        .route("/api/contratos/{id}", put(handlers::update_contract_handler))
        .route("/api/contratos/{id}", delete(handlers::delete_contract_handler))
}
