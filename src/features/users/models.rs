use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

#[derive(Type, Deserialize, Serialize, PartialEq, Eq, Default, Debug, Clone, Copy)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    #[serde(rename = "admin")]
    #[sqlx(rename = "admin")]
    Admin,
    #[default]
    #[serde(rename = "cliente")]
    #[sqlx(rename = "cliente")]
    Client,
    #[serde(rename = "corretor")]
    #[sqlx(rename = "corretor")]
    Broker,
}

#[derive(FromRow, Deserialize, Serialize, PartialEq, Debug, Clone)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "tipo_usuario")]
    pub role: UserRole,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}
