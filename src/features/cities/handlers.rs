use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    features::cities::{
        repository::CityRepository,
        schemas::{CityBody, CityFilter, CityFilterQuery},
    },
    services::database::Database,
    utilities::{
        errors::AppError,
        extractors::{AppJson, AppQuery},
        validation::path_id,
    },
};

fn not_found() -> AppError {
    AppError::NotFoundError("Cidade não encontrada.".to_string())
}

pub async fn list_cities_handler(
    State(database): State<Database>,
    AppQuery(query): AppQuery<CityFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CityFilter::try_from(query)?;
    let cities = CityRepository::list(&database.pool, &filter).await?;

    Ok(Json(cities))
}

pub async fn get_city_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let city = CityRepository::get_by_id(&database.pool, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(city))
}

pub async fn create_city_handler(
    State(database): State<Database>,
    AppJson(body): AppJson<CityBody>,
) -> Result<impl IntoResponse, AppError> {
    let city = CityRepository::create(&database.pool, body.into_new_city()?).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

pub async fn update_city_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
    AppJson(body): AppJson<CityBody>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let patch = body.into_patch()?;
    let city = CityRepository::update(&database.pool, id, patch)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(city))
}

pub async fn delete_city_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    if !CityRepository::delete(&database.pool, id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
