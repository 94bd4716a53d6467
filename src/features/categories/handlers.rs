use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    features::categories::{repository::CategoryRepository, schemas::CategoryBody},
    services::database::Database,
    utilities::{errors::AppError, extractors::AppJson, validation::path_id},
};

fn not_found() -> AppError {
    AppError::NotFoundError("Categoria não encontrada.".to_string())
}

pub async fn list_categories_handler(
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let categories = CategoryRepository::list(&database.pool).await?;
    Ok(Json(categories))
}

pub async fn get_category_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let category = CategoryRepository::get_by_id(&database.pool, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(category))
}

pub async fn create_category_handler(
    State(database): State<Database>,
    AppJson(body): AppJson<CategoryBody>,
) -> Result<impl IntoResponse, AppError> {
    let category = CategoryRepository::create(&database.pool, body.into_new_category()?).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
    AppJson(body): AppJson<CategoryBody>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let category = CategoryRepository::update(&database.pool, id, body.into_patch()?)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(category))
}

pub async fn delete_category_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    if !CategoryRepository::delete(&database.pool, id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
