use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    features::properties::{
        implementations::contains_pattern,
        models::Property,
        schemas::{NewProperty, PropertyFilter, PropertyPatch},
    },
    utilities::errors::AppError,
};

/// Joined projection over `source`, which must expose the `properties`
/// columns under the alias `p`.
fn select_from(source: &str) -> String {
    format!(
        r#"
        SELECT
            p.id,
            p.title,
            p.description,
            p.kind,
            p.category_id,
            p.city_id,
            p.address,
            p.price,
            p.status,
            p.created_at,
            c.name AS category_name,
            ci.name AS city_name,
            ci.state AS city_state
        FROM {source} p
        LEFT JOIN categories c ON c.id = p.category_id
        LEFT JOIN cities ci ON ci.id = p.city_id
        "#
    )
}

pub struct PropertyRepository;

impl PropertyRepository {
    pub async fn list(pool: &PgPool, filter: &PropertyFilter) -> Result<Vec<Property>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(select_from("properties"));
        query.push(" WHERE 1=1");

        if let Some(kind) = filter.kind {
            query.push(" AND p.kind = ").push_bind(kind);
        }
        if let Some(status) = filter.status {
            query.push(" AND p.status = ").push_bind(status);
        }
        if let Some(category_id) = filter.category_id {
            query.push(" AND p.category_id = ").push_bind(category_id);
        }
        if let Some(city_id) = filter.city_id {
            query.push(" AND p.city_id = ").push_bind(city_id);
        }
        if let Some(min_price) = &filter.min_price {
            query.push(" AND p.price >= ").push_bind(min_price.clone());
        }
        if let Some(max_price) = &filter.max_price {
            query.push(" AND p.price <= ").push_bind(max_price.clone());
        }
        if let Some(search) = &filter.search {
            let pattern = contains_pattern(search);
            query
                .push(" AND (p.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query.push(" ORDER BY p.created_at DESC, p.id DESC");

        let properties = query.build_query_as::<Property>().fetch_all(pool).await?;

        Ok(properties)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Property>, AppError> {
        let sql = format!("{} WHERE p.id = $1", select_from("properties"));
        let property = sqlx::query_as::<_, Property>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(property)
    }

    pub async fn create(pool: &PgPool, property: NewProperty) -> Result<Property, AppError> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO properties
                    (title, description, kind, category_id, city_id, address, price, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            {}
            "#,
            select_from("inserted")
        );

        let created = sqlx::query_as::<_, Property>(&sql)
            .bind(property.title)
            .bind(property.description)
            .bind(property.kind)
            .bind(property.category_id)
            .bind(property.city_id)
            .bind(property.address)
            .bind(property.price)
            .bind(property.status)
            .fetch_one(pool)
            .await?;

        Ok(created)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: PropertyPatch,
    ) -> Result<Option<Property>, AppError> {
        let Some(current) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(current));
        }

        let mut query = QueryBuilder::<Postgres>::new("WITH updated AS (UPDATE properties SET ");
        {
            let mut fields = query.separated(", ");
            if let Some(title) = patch.title {
                fields.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = patch.description {
                fields.push("description = ").push_bind_unseparated(description);
            }
            if let Some(kind) = patch.kind {
                fields.push("kind = ").push_bind_unseparated(kind);
            }
            if let Some(category_id) = patch.category_id {
                fields.push("category_id = ").push_bind_unseparated(category_id);
            }
            if let Some(city_id) = patch.city_id {
                fields.push("city_id = ").push_bind_unseparated(city_id);
            }
            if let Some(address) = patch.address {
                fields.push("address = ").push_bind_unseparated(address);
            }
            if let Some(price) = patch.price {
                fields.push("price = ").push_bind_unseparated(price);
            }
            if let Some(status) = patch.status {
                fields.push("status = ").push_bind_unseparated(status);
            }
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING *) ")
            .push(select_from("updated"));

        let updated = query.build_query_as::<Property>().fetch_optional(pool).await?;

        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
