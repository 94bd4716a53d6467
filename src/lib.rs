pub mod features;
pub mod services;
pub mod utilities;

use std::any::Any;

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use sqlx::migrate::Migrator;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use crate::{
    features::{categories, cities, contracts, health, photos, properties, users},
    utilities::{app_state::AppState, errors::AppError},
};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const UPLOAD_CACHE_CONTROL: &str = "public, max-age=86400";

pub fn build_router(state: AppState) -> Router {
    let uploaded_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static(UPLOAD_CACHE_CONTROL),
        ))
        .service(
            ServeDir::new(&state.uploads.root).not_found_service(not_found_handler.into_service()),
        );

    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(categories::routes())
        .merge(cities::routes())
        .merge(properties::routes())
        .merge(contracts::routes())
        .merge(photos::routes(&state.uploads))
        .nest_service("/uploads", uploaded_files)
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found_handler() -> AppError {
    AppError::NotFoundError("Not Found".to_string())
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    AppError::InternalError(format!("handler panicked, {detail}")).into_response()
}
