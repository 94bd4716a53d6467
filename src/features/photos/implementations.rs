use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};

use crate::{
    features::photos::{
        models::Photo,
        schemas::{PhotoLinkBody, PhotoOut, PhotoPayload, UploadedPhotoOut},
    },
    services::uploads::{StoredFile, filename_of},
    utilities::{errors::AppError, extractors::AppJson},
};

impl From<Photo> for PhotoOut {
    fn from(photo: Photo) -> Self {
        let filename = filename_of(&photo.url);
        Self { photo, filename }
    }
}

impl UploadedPhotoOut {
    pub fn new(photo: Photo, file: &StoredFile) -> Self {
        Self {
            photo: photo.into(),
            original_name: file.original_name.clone(),
            size: file.size,
        }
    }
}

impl PhotoLinkBody {
    /// Trimmed url, or `None` when blank or not a string.
    pub fn url(&self) -> Option<String> {
        self.url
            .as_ref()
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned)
    }

    pub fn description(&self) -> Option<String> {
        self.description
            .as_ref()
            .and_then(|value| value.as_str())
            .map(ToOwned::to_owned)
    }
}

impl<S> FromRequest<S> for PhotoPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase);

        match content_type {
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state).await.map_err(|_| {
                    AppError::InvalidFormData("Falha ao processar upload.".to_string())
                })?;
                Ok(Self::Upload(multipart))
            }
            Some(_) => {
                let AppJson(body) = AppJson::<PhotoLinkBody>::from_request(req, state).await?;
                Ok(Self::Link(body))
            }
            None => Ok(Self::Link(PhotoLinkBody::default())),
        }
    }
}
