use sqlx::PgPool;

use crate::{
    features::categories::{
        models::Category,
        schemas::{CategoryPatch, NewCategory},
    },
    utilities::errors::AppError,
};

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, AppError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
                .fetch_all(pool)
                .await?;

        Ok(categories)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(category)
    }

    pub async fn create(pool: &PgPool, category: NewCategory) -> Result<Category, AppError> {
        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(category.name)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, AppError> {
        let Some(current) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        let Some(name) = patch.name else {
            return Ok(Some(current));
        };

        let updated = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
