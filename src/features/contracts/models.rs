use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::utilities::validation::serialize_money;

#[derive(Type, Deserialize, Serialize, PartialEq, Eq, Debug, Clone, Copy)]
#[sqlx(type_name = "contract_kind")]
pub enum ContractKind {
    #[serde(rename = "aluguel")]
    #[sqlx(rename = "aluguel")]
    Rental,
    #[serde(rename = "venda")]
    #[sqlx(rename = "venda")]
    Sale,
}

/// A contract row plus the display fields of its property and user.
#[derive(FromRow, Deserialize, Serialize, PartialEq, Debug, Clone)]
pub struct Contract {
    pub id: i64,
    #[serde(rename = "imovel_id")]
    pub property_id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    #[serde(rename = "tipo_contrato")]
    pub kind: ContractKind,
    #[serde(rename = "data_inicio")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "data_fim")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "valor", serialize_with = "serialize_money")]
    pub price: BigDecimal,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "imovel_titulo")]
    pub property_title: String,
    #[serde(rename = "usuario_nome")]
    pub user_name: String,
    #[serde(rename = "usuario_email")]
    pub user_email: String,
}
