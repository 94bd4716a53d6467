use std::sync::LazyLock;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde_json::json;
use sqlx::postgres::PgDatabaseError;
use tracing::{debug, error};

use crate::utilities::validation::FieldError;

pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File read error, {0}")]
    FileReadError(String),
    #[error("Database connection error, {0}")]
    DatabaseConnectionError(String),
    #[error("Sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("IO error, {0}")]
    IoError(#[from] std::io::Error),
    #[error("Validation error, {0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("Upload error, {0}")]
    UploadError(String),
    #[error("Invalid form data, {0}")]
    InvalidFormData(String),
    #[error("Json rejection, {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Query rejection, {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Internal error, {0}")]
    InternalError(String),
}

impl From<FieldError> for AppError {
    fn from(error: FieldError) -> Self {
        Self::ValidationError(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::ValidationError(e) => (StatusCode::BAD_REQUEST, e),
            Self::UploadError(e) => (StatusCode::BAD_REQUEST, e),
            Self::InvalidFormData(e) => (StatusCode::BAD_REQUEST, e),
            Self::JsonRejection(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            Self::QueryRejection(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            Self::NotFoundError(e) => (StatusCode::NOT_FOUND, e),
            Self::ConflictError(e) => (StatusCode::CONFLICT, e),
            Self::SqlxError(e) => match StorageFailure::from_sqlx(&e)
                .as_ref()
                .and_then(map_storage_failure)
            {
                Some((status, message)) => {
                    debug!("mapped storage error to {status}: {e}");
                    (status, message)
                }
                None => {
                    error!("unclassified storage error: {e:?}");
                    internal_error()
                }
            },
            other => {
                error!("unhandled error: {other:?}");
                internal_error()
            }
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}

fn internal_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
    )
}

// -- =====================
// -- STORAGE ERROR TAXONOMY
// -- =====================

/// Engine-independent view of a failed statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageFailure {
    pub code: Option<String>,
    pub message: Option<String>,
    pub detail: Option<String>,
    pub constraint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCondition {
    DuplicateKey,
    ValueTooLong,
    MalformedValue,
    MissingRequired,
    DanglingReference,
    ReferencedByDependents,
    Other,
}

static DUPLICATE_KEY_DETAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Key \((.+)\)=\((.*)\) already exists").unwrap());

impl StorageFailure {
    /// Only errors reported by the database server carry a payload worth mapping;
    /// pool, io and decode failures yield `None`.
    pub fn from_sqlx(error: &sqlx::Error) -> Option<Self> {
        let database_error = error.as_database_error()?;
        let detail = database_error
            .try_downcast_ref::<PgDatabaseError>()
            .and_then(|pg| pg.detail())
            .map(ToOwned::to_owned);

        Some(Self {
            code: database_error.code().map(|code| code.into_owned()),
            message: Some(database_error.message().to_owned()),
            detail,
            constraint: database_error.constraint().map(ToOwned::to_owned),
        })
    }

    /// Remaps PostgreSQL SQLSTATE codes into the shared taxonomy.
    pub fn condition(&self) -> Option<StorageCondition> {
        let code = self.code.as_deref()?;
        let condition = match code {
            "23505" => StorageCondition::DuplicateKey,
            "22001" | "22003" => StorageCondition::ValueTooLong,
            "22007" | "22008" | "22P02" => StorageCondition::MalformedValue,
            "23502" => StorageCondition::MissingRequired,
            "23503" => {
                let blocked_delete = self
                    .message
                    .as_deref()
                    .is_some_and(|message| message.starts_with("update or delete on table"));
                if blocked_delete {
                    StorageCondition::ReferencedByDependents
                } else {
                    StorageCondition::DanglingReference
                }
            }
            _ => StorageCondition::Other,
        };
        Some(condition)
    }

    fn duplicate_message(&self) -> String {
        let captures = self
            .detail
            .as_deref()
            .and_then(|detail| DUPLICATE_KEY_DETAIL.captures(detail));

        match captures {
            Some(captures) => {
                let value = &captures[2];
                let key = self.constraint.as_deref().unwrap_or(&captures[1]);
                format!("Valor '{value}' já está em uso ({key}).")
            }
            None => "Registro duplicado: o valor informado já está em uso.".to_string(),
        }
    }
}

/// Translates a storage failure into a client-facing status and message.
///
/// Returns `None` when the failure is not classifiable; callers escalate those
/// as internal errors.
pub fn map_storage_failure(failure: &StorageFailure) -> Option<(StatusCode, String)> {
    let mapped = match failure.condition() {
        Some(StorageCondition::DuplicateKey) => (StatusCode::CONFLICT, failure.duplicate_message()),
        Some(StorageCondition::ValueTooLong) => (
            StatusCode::BAD_REQUEST,
            "Dados inválidos para um dos campos enviados.".to_string(),
        ),
        Some(StorageCondition::MalformedValue) => (
            StatusCode::BAD_REQUEST,
            "Formato de dado inválido para um dos campos enviados.".to_string(),
        ),
        Some(StorageCondition::MissingRequired) => (
            StatusCode::BAD_REQUEST,
            "Campos obrigatórios ausentes.".to_string(),
        ),
        Some(StorageCondition::DanglingReference) => (
            StatusCode::BAD_REQUEST,
            "Referência inválida: registro relacionado não encontrado.".to_string(),
        ),
        Some(StorageCondition::ReferencedByDependents) => (
            StatusCode::CONFLICT,
            "Não é possível excluir: existem registros relacionados a este recurso.".to_string(),
        ),
        Some(StorageCondition::Other) | None => {
            let message = failure.message.as_deref().map(str::trim)?;
            if message.is_empty() {
                return None;
            }
            (StatusCode::BAD_REQUEST, message.to_string())
        }
    };

    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: &str, message: &str) -> StorageFailure {
        StorageFailure {
            code: Some(code.to_string()),
            message: Some(message.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_key_names_value_and_constraint() {
        let failure = StorageFailure {
            detail: Some("Key (email)=(ana@example.com) already exists.".to_string()),
            constraint: Some("users_email_key".to_string()),
            ..failure(
                "23505",
                "duplicate key value violates unique constraint \"users_email_key\"",
            )
        };

        let (status, message) = map_storage_failure(&failure).unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            message,
            "Valor 'ana@example.com' já está em uso (users_email_key)."
        );
    }

    #[test]
    fn duplicate_key_without_detail_uses_generic_message() {
        let (status, message) = map_storage_failure(&failure("23505", "duplicate")).unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "Registro duplicado: o valor informado já está em uso.");
    }

    #[test]
    fn foreign_key_violation_depends_on_direction() {
        let insert = failure(
            "23503",
            "insert or update on table \"properties\" violates foreign key constraint \"properties_city_id_fkey\"",
        );
        let delete = failure(
            "23503",
            "update or delete on table \"cities\" violates foreign key constraint \"properties_city_id_fkey\" on table \"properties\"",
        );

        assert_eq!(insert.condition(), Some(StorageCondition::DanglingReference));
        assert_eq!(map_storage_failure(&insert).unwrap().0, StatusCode::BAD_REQUEST);
        assert_eq!(
            delete.condition(),
            Some(StorageCondition::ReferencedByDependents)
        );
        assert_eq!(map_storage_failure(&delete).unwrap().0, StatusCode::CONFLICT);
    }

    #[test]
    fn value_and_null_violations_are_bad_requests() {
        for code in ["22001", "22003", "22007", "22008", "22P02", "23502"] {
            let (status, _) = map_storage_failure(&failure(code, "boom")).unwrap();
            assert_eq!(status, StatusCode::BAD_REQUEST, "code {code}");
        }
    }

    #[test]
    fn other_engine_errors_surface_their_message() {
        let (status, message) =
            map_storage_failure(&failure("42P01", "relation \"nope\" does not exist")).unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "relation \"nope\" does not exist");
    }

    #[test]
    fn failures_without_message_are_unclassified() {
        assert!(map_storage_failure(&StorageFailure::default()).is_none());
        assert!(
            map_storage_failure(&StorageFailure {
                code: Some("XX000".to_string()),
                message: Some("   ".to_string()),
                ..Default::default()
            })
            .is_none()
        );
    }

    #[test]
    fn non_database_sqlx_errors_have_no_payload() {
        assert!(StorageFailure::from_sqlx(&sqlx::Error::PoolTimedOut).is_none());
        assert!(StorageFailure::from_sqlx(&sqlx::Error::RowNotFound).is_none());
    }

    #[tokio::test]
    async fn responses_carry_a_message_body() {
        let response = AppError::ConflictError("em uso".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "message": "em uso" }));
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let response = AppError::InternalError("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "message": INTERNAL_SERVER_ERROR_MESSAGE }));
    }
}
