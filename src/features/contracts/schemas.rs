use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::{features::contracts::models::ContractKind, utilities::validation::RawField};

#[derive(Deserialize, Debug, Default)]
pub struct ContractBody {
    #[serde(default, rename = "imovel_id", with = "::serde_with::rust::double_option")]
    pub property_id: RawField,
    #[serde(default, rename = "usuario_id", with = "::serde_with::rust::double_option")]
    pub user_id: RawField,
    #[serde(default, rename = "tipo_contrato", with = "::serde_with::rust::double_option")]
    pub kind: RawField,
    #[serde(default, rename = "data_inicio", with = "::serde_with::rust::double_option")]
    pub start_date: RawField,
    #[serde(default, rename = "data_fim", with = "::serde_with::rust::double_option")]
    pub end_date: RawField,
    #[serde(default, rename = "valor", with = "::serde_with::rust::double_option")]
    pub price: RawField,
}

/// Dates stay as validated `YYYY-MM-DD` text; the store casts them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub property_id: i64,
    pub user_id: i64,
    pub kind: ContractKind,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractPatch {
    pub property_id: Option<i64>,
    pub user_id: Option<i64>,
    pub kind: Option<ContractKind>,
    pub start_date: Option<Option<String>>,
    pub end_date: Option<Option<String>>,
    pub price: Option<BigDecimal>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ContractFilterQuery {
    pub imovel_id: Option<String>,
    pub usuario_id: Option<String>,
    pub tipo_contrato: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContractFilter {
    pub property_id: Option<i64>,
    pub user_id: Option<i64>,
    pub kind: Option<ContractKind>,
}
