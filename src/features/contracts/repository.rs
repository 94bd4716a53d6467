use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    features::contracts::{
        models::Contract,
        schemas::{ContractFilter, ContractPatch, NewContract},
    },
    utilities::errors::AppError,
};

/// Joined projection over `source`, aliased `ct`.
fn select_from(source: &str) -> String {
    format!(
        r#"
        SELECT
            ct.id,
            ct.property_id,
            ct.user_id,
            ct.kind,
            ct.start_date,
            ct.end_date,
            ct.price,
            ct.created_at,
            p.title AS property_title,
            u.name AS user_name,
            u.email AS user_email
        FROM {source} ct
        INNER JOIN properties p ON p.id = ct.property_id
        INNER JOIN users u ON u.id = ct.user_id
        "#
    )
}

pub struct ContractRepository;

impl ContractRepository {
    pub async fn list(pool: &PgPool, filter: &ContractFilter) -> Result<Vec<Contract>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(select_from("contracts"));
        query.push(" WHERE 1=1");

        if let Some(property_id) = filter.property_id {
            query.push(" AND ct.property_id = ").push_bind(property_id);
        }
        if let Some(user_id) = filter.user_id {
            query.push(" AND ct.user_id = ").push_bind(user_id);
        }
        if let Some(kind) = filter.kind {
            query.push(" AND ct.kind = ").push_bind(kind);
        }

        query.push(" ORDER BY ct.created_at DESC, ct.id DESC");

        let contracts = query.build_query_as::<Contract>().fetch_all(pool).await?;

        Ok(contracts)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Contract>, AppError> {
        let sql = format!("{} WHERE ct.id = $1", select_from("contracts"));
        let contract = sqlx::query_as::<_, Contract>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(contract)
    }

    pub async fn create(pool: &PgPool, contract: NewContract) -> Result<Contract, AppError> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO contracts
                    (property_id, user_id, kind, start_date, end_date, price)
                VALUES ($1, $2, $3, $4::date, $5::date, $6)
                RETURNING *
            )
            {}
            "#,
            select_from("inserted")
        );

        let created = sqlx::query_as::<_, Contract>(&sql)
            .bind(contract.property_id)
            .bind(contract.user_id)
            .bind(contract.kind)
            .bind(contract.start_date)
            .bind(contract.end_date)
            .bind(contract.price)
            .fetch_one(pool)
            .await?;

        Ok(created)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: ContractPatch,
    ) -> Result<Option<Contract>, AppError> {
        let Some(current) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(current));
        }

        let mut query = QueryBuilder::<Postgres>::new("WITH updated AS (UPDATE contracts SET ");
        {
            let mut fields = query.separated(", ");
            if let Some(property_id) = patch.property_id {
                fields.push("property_id = ").push_bind_unseparated(property_id);
            }
            if let Some(user_id) = patch.user_id {
                fields.push("user_id = ").push_bind_unseparated(user_id);
            }
            if let Some(kind) = patch.kind {
                fields.push("kind = ").push_bind_unseparated(kind);
            }
            if let Some(start_date) = patch.start_date {
                fields
                    .push("start_date = ")
                    .push_bind_unseparated(start_date)
                    .push_unseparated("::date");
            }
            if let Some(end_date) = patch.end_date {
                fields
                    .push("end_date = ")
                    .push_bind_unseparated(end_date)
                    .push_unseparated("::date");
            }
            if let Some(price) = patch.price {
                fields.push("price = ").push_bind_unseparated(price);
            }
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING *) ")
            .push(select_from("updated"));

        let updated = query.build_query_as::<Contract>().fetch_optional(pool).await?;

        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
