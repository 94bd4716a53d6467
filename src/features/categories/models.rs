use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Deserialize, Serialize, PartialEq, Eq, Debug, Clone)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}
