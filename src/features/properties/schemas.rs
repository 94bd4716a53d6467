use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::{
    features::properties::models::{PropertyKind, PropertyStatus},
    utilities::validation::RawField,
};

#[derive(Deserialize, Debug, Default)]
pub struct PropertyBody {
    #[serde(default, rename = "titulo", with = "::serde_with::rust::double_option")]
    pub title: RawField,
    #[serde(default, rename = "descricao", with = "::serde_with::rust::double_option")]
    pub description: RawField,
    #[serde(default, rename = "tipo", with = "::serde_with::rust::double_option")]
    pub kind: RawField,
    #[serde(default, rename = "categoria_id", with = "::serde_with::rust::double_option")]
    pub category_id: RawField,
    #[serde(default, rename = "cidade_id", with = "::serde_with::rust::double_option")]
    pub city_id: RawField,
    #[serde(default, rename = "endereco", with = "::serde_with::rust::double_option")]
    pub address: RawField,
    #[serde(default, rename = "valor", with = "::serde_with::rust::double_option")]
    pub price: RawField,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub status: RawField,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub title: String,
    pub description: Option<String>,
    pub kind: PropertyKind,
    pub category_id: Option<i64>,
    pub city_id: Option<i64>,
    pub address: Option<String>,
    pub price: BigDecimal,
    pub status: PropertyStatus,
}

/// Outer `None` leaves a column untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<PropertyKind>,
    pub category_id: Option<Option<i64>>,
    pub city_id: Option<Option<i64>>,
    pub address: Option<Option<String>>,
    pub price: Option<BigDecimal>,
    pub status: Option<PropertyStatus>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PropertyFilterQuery {
    pub tipo: Option<String>,
    pub status: Option<String>,
    pub categoria_id: Option<String>,
    pub cidade_id: Option<String>,
    pub valor_min: Option<String>,
    pub valor_max: Option<String>,
    pub busca: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub kind: Option<PropertyKind>,
    pub status: Option<PropertyStatus>,
    pub category_id: Option<i64>,
    pub city_id: Option<i64>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub search: Option<String>,
}
