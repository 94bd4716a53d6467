use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    features::users::{
        repository::UserRepository,
        schemas::{UserBody, UserFilter, UserFilterQuery},
    },
    services::database::Database,
    utilities::{
        errors::AppError,
        extractors::{AppJson, AppQuery},
        validation::path_id,
    },
};

const USER_NOT_FOUND: &str = "Usuário não encontrado.";

fn not_found() -> AppError {
    AppError::NotFoundError(USER_NOT_FOUND.to_string())
}

pub async fn list_users_handler(
    State(database): State<Database>,
    AppQuery(query): AppQuery<UserFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = UserFilter::try_from(query)?;
    let users = UserRepository::list(&database.pool, &filter).await?;

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let user = UserRepository::get_by_id(&database.pool, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(user))
}

pub async fn create_user_handler(
    State(database): State<Database>,
    AppJson(body): AppJson<UserBody>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = body.into_new_user()?;
    let user = UserRepository::create(&database.pool, new_user).await?;

    debug!("created user {}", user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UserBody>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let patch = body.into_patch()?;
    let user = UserRepository::update(&database.pool, id, patch)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(user))
}

pub async fn delete_user_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    if !UserRepository::delete(&database.pool, id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
