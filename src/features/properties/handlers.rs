use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    features::{
        photos::{repository::PhotoRepository, schemas::PhotoOut},
        properties::{
            models::PropertyDetail,
            repository::PropertyRepository,
            schemas::{PropertyBody, PropertyFilter, PropertyFilterQuery},
        },
    },
    services::{
        database::Database,
        uploads::{UploadSettings, delete_files_safely},
    },
    utilities::{
        errors::AppError,
        extractors::{AppJson, AppQuery},
        validation::path_id,
    },
};

fn not_found() -> AppError {
    AppError::NotFoundError("Imóvel não encontrado.".to_string())
}

pub async fn list_properties_handler(
    State(database): State<Database>,
    AppQuery(query): AppQuery<PropertyFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = PropertyFilter::try_from(query)?;
    let properties = PropertyRepository::list(&database.pool, &filter).await?;

    Ok(Json(properties))
}

pub async fn get_property_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let property = PropertyRepository::get_by_id(&database.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let photos = PhotoRepository::list_by_property(&database.pool, id)
        .await?
        .into_iter()
        .map(PhotoOut::from)
        .collect();

    Ok(Json(PropertyDetail { property, photos }))
}

pub async fn create_property_handler(
    State(database): State<Database>,
    AppJson(body): AppJson<PropertyBody>,
) -> Result<impl IntoResponse, AppError> {
    let new_property = body.into_new_property()?;
    let property = PropertyRepository::create(&database.pool, new_property).await?;

    debug!("created property {}", property.id);

    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn update_property_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
    AppJson(body): AppJson<PropertyBody>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let patch = body.into_patch()?;
    let property = PropertyRepository::update(&database.pool, id, patch)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(property))
}

/// Photo rows go with the property; their uploaded files are reclaimed
/// afterwards.
pub async fn delete_property_handler(
    State(database): State<Database>,
    State(settings): State<UploadSettings>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let photos = PhotoRepository::list_by_property(&database.pool, id).await?;

    if !PropertyRepository::delete(&database.pool, id).await? {
        return Err(not_found());
    }

    let files: Vec<_> = photos
        .iter()
        .filter_map(|photo| settings.resolve_public_url(&photo.url))
        .collect();
    if !files.is_empty() {
        delete_files_safely(files).await;
    }

    Ok(StatusCode::NO_CONTENT)
}
