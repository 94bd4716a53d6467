use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use tracing::debug;

use crate::{
    features::{
        contracts::{
            repository::ContractRepository,
            schemas::{ContractBody, ContractFilter, ContractFilterQuery},
        },
        properties::repository::PropertyRepository,
        users::repository::UserRepository,
    },
    services::database::Database,
    utilities::{
        errors::AppError,
        extractors::{AppJson, AppQuery},
        validation::path_id,
    },
};

fn not_found() -> AppError {
    AppError::NotFoundError("Contrato não encontrado.".to_string())
}

/// Checks that the referenced property and user exist, concurrently.
/// `None` skips a check.
pub async fn ensure_references(
    pool: &PgPool,
    property_id: Option<i64>,
    user_id: Option<i64>,
) -> Result<(), AppError> {
    let property_exists = async {
        match property_id {
            Some(id) => Ok(PropertyRepository::get_by_id(pool, id).await?.is_some()),
            None => Ok::<_, AppError>(true),
        }
    };
    let user_exists = async {
        match user_id {
            Some(id) => Ok(UserRepository::get_by_id(pool, id).await?.is_some()),
            None => Ok::<_, AppError>(true),
        }
    };

    let (property_exists, user_exists) = tokio::try_join!(property_exists, user_exists)?;

    if !property_exists {
        return Err(AppError::NotFoundError(
            "Imóvel informado não existe.".to_string(),
        ));
    }
    if !user_exists {
        return Err(AppError::NotFoundError(
            "Usuário informado não existe.".to_string(),
        ));
    }

    Ok(())
}

pub async fn list_contracts_handler(
    State(database): State<Database>,
    AppQuery(query): AppQuery<ContractFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ContractFilter::try_from(query)?;
    let contracts = ContractRepository::list(&database.pool, &filter).await?;

    Ok(Json(contracts))
}

pub async fn get_contract_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let contract = ContractRepository::get_by_id(&database.pool, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(contract))
}

pub async fn create_contract_handler(
    State(database): State<Database>,
    AppJson(body): AppJson<ContractBody>,
) -> Result<impl IntoResponse, AppError> {
    let new_contract = body.into_new_contract()?;
    ensure_references(
        &database.pool,
        Some(new_contract.property_id),
        Some(new_contract.user_id),
    )
    .await?;

    let contract = ContractRepository::create(&database.pool, new_contract).await?;

    debug!("created contract {}", contract.id);

    Ok((StatusCode::CREATED, Json(contract)))
}

pub async fn update_contract_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
    AppJson(body): AppJson<ContractBody>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    let patch = body.into_patch()?;
    ensure_references(&database.pool, patch.property_id, patch.user_id).await?;

    let contract = ContractRepository::update(&database.pool, id, patch)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(contract))
}

pub async fn delete_contract_handler(
    State(database): State<Database>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(&id)?;
    if !ContractRepository::delete(&database.pool, id).await? {
        return Err(not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
