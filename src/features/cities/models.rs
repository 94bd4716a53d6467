use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Deserialize, Serialize, PartialEq, Eq, Debug, Clone)]
pub struct City {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    /// Two-letter state code, always upper case.
    #[serde(rename = "estado")]
    pub state: String,
}
