use axum::extract::{FromRequest, FromRequestParts};

use crate::utilities::errors::AppError;

/// `axum::Json` answering rejections with the `{"message": ...}` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` with the same rejection shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
