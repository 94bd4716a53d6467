use sqlx::PgPool;

use crate::{
    features::photos::models::Photo, services::uploads::PhotoRows, utilities::errors::AppError,
};

pub struct PhotoRepository;

impl PhotoRepository {
    pub async fn list_by_property(pool: &PgPool, property_id: i64) -> Result<Vec<Photo>, AppError> {
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, property_id, url, description
            FROM photos
            WHERE property_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(pool)
        .await?;

        Ok(photos)
    }

    pub async fn count_by_property(pool: &PgPool, property_id: i64) -> Result<usize, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE property_id = $1")
            .bind(property_id)
            .fetch_one(pool)
            .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<_, Photo>(
            "SELECT id, property_id, url, description FROM photos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(photo)
    }

    pub async fn create(
        pool: &PgPool,
        property_id: i64,
        url: &str,
        description: Option<&str>,
    ) -> Result<Photo, AppError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (property_id, url, description)
            VALUES ($1, $2, $3)
            RETURNING id, property_id, url, description
            "#,
        )
        .bind(property_id)
        .bind(url)
        .bind(description)
        .fetch_one(pool)
        .await?;

        Ok(photo)
    }

    /// Deletes a photo only when it belongs to `property_id`.
    pub async fn delete(pool: &PgPool, property_id: i64, photo_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1 AND property_id = $2")
            .bind(photo_id)
            .bind(property_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl PhotoRows for PgPool {
    async fn insert_photo(
        &self,
        property_id: i64,
        url: &str,
        description: Option<&str>,
    ) -> Result<Photo, AppError> {
        PhotoRepository::create(self, property_id, url, description).await
    }

    async fn remove_photo(&self, property_id: i64, photo_id: i64) -> Result<bool, AppError> {
        PhotoRepository::delete(self, property_id, photo_id).await
    }
}
