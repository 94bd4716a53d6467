use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::{
    features::{
        photos::{
            repository::PhotoRepository,
            schemas::{PhotoOut, PhotoPayload, PhotosCreated, UploadedPhotoOut},
        },
        properties::repository::PropertyRepository,
    },
    services::{
        database::Database,
        uploads::{self, ReceivedUpload, UploadSettings, check_quota, delete_files_safely},
    },
    utilities::{errors::AppError, validation::parse_id},
};

const PROPERTY_NOT_FOUND: &str = "Imovel nao encontrado.";
const PHOTO_NOT_FOUND: &str = "Foto nao encontrada.";
const MISSING_PHOTO: &str = "Envie ao menos uma foto ou forneca uma URL valida.";

fn property_id_from(raw: &str) -> Result<i64, AppError> {
    parse_id(raw)
        .ok_or_else(|| AppError::ValidationError("Identificador de imovel invalido.".to_string()))
}

async fn ensure_property(pool: &PgPool, property_id: i64) -> Result<(), AppError> {
    if PropertyRepository::get_by_id(pool, property_id).await?.is_none() {
        return Err(AppError::NotFoundError(PROPERTY_NOT_FOUND.to_string()));
    }
    Ok(())
}

pub async fn list_photos_handler(
    State(database): State<Database>,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property_id = property_id_from(&property_id)?;
    ensure_property(&database.pool, property_id).await?;

    let photos: Vec<PhotoOut> = PhotoRepository::list_by_property(&database.pool, property_id)
        .await?
        .into_iter()
        .map(PhotoOut::from)
        .collect();

    Ok(Json(photos))
}

pub async fn create_photos_handler(
    State(database): State<Database>,
    State(settings): State<UploadSettings>,
    Path(property_id): Path<String>,
    payload: PhotoPayload,
) -> Result<impl IntoResponse, AppError> {
    let property_id = property_id_from(&property_id)?;
    ensure_property(&database.pool, property_id).await?;

    let (url, description) = match payload {
        PhotoPayload::Link(body) => (body.url(), body.description()),
        PhotoPayload::Upload(multipart) => {
            let received = uploads::receive(multipart, &settings, property_id).await?;
            if !received.files.is_empty() {
                return create_from_files(&database.pool, &settings, property_id, received).await;
            }
            let url = received
                .url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(ToOwned::to_owned);
            (url, received.description)
        }
    };

    let url = url.ok_or_else(|| AppError::ValidationError(MISSING_PHOTO.to_string()))?;
    let existing = PhotoRepository::count_by_property(&database.pool, property_id).await?;
    check_quota(existing, 1, settings.max_files_per_property)?;

    let photo =
        PhotoRepository::create(&database.pool, property_id, &url, description.as_deref()).await?;

    debug!("linked photo {} to property {property_id}", photo.id);

    Ok((
        StatusCode::CREATED,
        Json(PhotosCreated {
            fotos: vec![PhotoOut::from(photo)],
        }),
    )
        .into_response())
}

async fn create_from_files(
    pool: &PgPool,
    settings: &UploadSettings,
    property_id: i64,
    received: ReceivedUpload,
) -> Result<axum::response::Response, AppError> {
    let quota = match PhotoRepository::count_by_property(pool, property_id).await {
        Ok(existing) => check_quota(existing, received.files.len(), settings.max_files_per_property),
        Err(e) => Err(e),
    };
    if let Err(e) = quota {
        received.discard().await;
        return Err(e);
    }

    let photos = uploads::persist_batch(
        pool,
        property_id,
        &received.files,
        received.description.as_deref(),
    )
    .await?;

    info!("stored {} photos for property {property_id}", photos.len());

    let fotos: Vec<UploadedPhotoOut> = photos
        .into_iter()
        .zip(received.files.iter())
        .map(|(photo, file)| UploadedPhotoOut::new(photo, file))
        .collect();

    Ok((StatusCode::CREATED, Json(PhotosCreated { fotos })).into_response())
}

pub async fn delete_photo_handler(
    State(database): State<Database>,
    State(settings): State<UploadSettings>,
    Path((property_id, photo_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(property_id), Some(photo_id)) = (parse_id(&property_id), parse_id(&photo_id)) else {
        return Err(AppError::ValidationError(
            "Identificadores invalidos.".to_string(),
        ));
    };

    ensure_property(&database.pool, property_id).await?;

    let photo = PhotoRepository::get_by_id(&database.pool, photo_id)
        .await?
        .filter(|photo| photo.property_id == property_id)
        .ok_or_else(|| AppError::NotFoundError(PHOTO_NOT_FOUND.to_string()))?;

    if !PhotoRepository::delete(&database.pool, property_id, photo_id).await? {
        return Err(AppError::NotFoundError(PHOTO_NOT_FOUND.to_string()));
    }

    if let Some(path) = settings.resolve_public_url(&photo.url) {
        delete_files_safely([path]).await;
    }

    Ok(StatusCode::NO_CONTENT)
}
