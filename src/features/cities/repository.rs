use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    features::cities::{
        models::City,
        schemas::{CityFilter, CityPatch, NewCity},
    },
    utilities::errors::AppError,
};

pub struct CityRepository;

impl CityRepository {
    pub async fn list(pool: &PgPool, filter: &CityFilter) -> Result<Vec<City>, AppError> {
        let mut query =
            QueryBuilder::<Postgres>::new("SELECT id, name, state FROM cities WHERE 1=1");

        if let Some(state) = &filter.state {
            query.push(" AND state = ").push_bind(state.clone());
        }

        query.push(" ORDER BY name ASC");

        let cities = query.build_query_as::<City>().fetch_all(pool).await?;

        Ok(cities)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<City>, AppError> {
        let city = sqlx::query_as::<_, City>("SELECT id, name, state FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(city)
    }

    pub async fn create(pool: &PgPool, city: NewCity) -> Result<City, AppError> {
        let created = sqlx::query_as::<_, City>(
            "INSERT INTO cities (name, state) VALUES ($1, $2) RETURNING id, name, state",
        )
        .bind(city.name)
        .bind(city.state)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    pub async fn update(pool: &PgPool, id: i64, patch: CityPatch) -> Result<Option<City>, AppError> {
        let Some(current) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(current));
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE cities SET ");
        {
            let mut fields = query.separated(", ");
            if let Some(name) = patch.name {
                fields.push("name = ").push_bind_unseparated(name);
            }
            if let Some(state) = patch.state {
                fields.push("state = ").push_bind_unseparated(state);
            }
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, name, state");

        let updated = query.build_query_as::<City>().fetch_optional(pool).await?;

        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
