use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    features::users::{
        models::User,
        schemas::{NewUser, UserFilter, UserPatch},
    },
    utilities::errors::AppError,
};

const USER_COLUMNS: &str = "id, name, email, phone, role, created_at";

pub struct UserRepository;

impl UserRepository {
    pub async fn list(pool: &PgPool, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE 1=1"
        ));

        if let Some(role) = filter.role {
            query.push(" AND role = ").push_bind(role);
        }

        query.push(" ORDER BY created_at DESC, id DESC");

        let users = query.build_query_as::<User>().fetch_all(pool).await?;

        Ok(users)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn create(pool: &PgPool, user: NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, phone, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.role)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    /// Applies the fields present in `patch`. Absent rows yield `None`; an
    /// empty patch returns the stored row without writing.
    pub async fn update(pool: &PgPool, id: i64, patch: UserPatch) -> Result<Option<User>, AppError> {
        let Some(current) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(current));
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut fields = query.separated(", ");
            if let Some(name) = patch.name {
                fields.push("name = ").push_bind_unseparated(name);
            }
            if let Some(email) = patch.email {
                fields.push("email = ").push_bind_unseparated(email);
            }
            if let Some(phone) = patch.phone {
                fields.push("phone = ").push_bind_unseparated(phone);
            }
            if let Some(role) = patch.role {
                fields.push("role = ").push_bind_unseparated(role);
            }
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {USER_COLUMNS}"));

        let updated = query.build_query_as::<User>().fetch_optional(pool).await?;

        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
