use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::features::photos::models::Photo;

/// JSON body for attaching an external photo url.
#[derive(Deserialize, Debug, Default)]
pub struct PhotoLinkBody {
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default, rename = "descricao")]
    pub description: Option<Value>,
}

/// `POST /imoveis/{id}/fotos` accepts either uploaded files or a url.
pub enum PhotoPayload {
    Upload(Multipart),
    Link(PhotoLinkBody),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PhotoOut {
    #[serde(flatten)]
    pub photo: Photo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UploadedPhotoOut {
    #[serde(flatten)]
    pub photo: PhotoOut,
    #[serde(rename = "originalName")]
    pub original_name: Option<String>,
    pub size: u64,
}

#[derive(Serialize, Debug)]
pub struct PhotosCreated<T> {
    pub fotos: Vec<T>,
}
