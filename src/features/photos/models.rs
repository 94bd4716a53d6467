use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Deserialize, Serialize, PartialEq, Eq, Debug, Clone)]
pub struct Photo {
    pub id: i64,
    #[serde(rename = "imovel_id")]
    pub property_id: i64,
    pub url: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}
