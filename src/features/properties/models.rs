use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::{features::photos::schemas::PhotoOut, utilities::validation::serialize_money};

#[derive(Type, Deserialize, Serialize, PartialEq, Eq, Debug, Clone, Copy)]
#[sqlx(type_name = "property_kind")]
pub enum PropertyKind {
    #[serde(rename = "casa")]
    #[sqlx(rename = "casa")]
    House,
    #[serde(rename = "apartamento")]
    #[sqlx(rename = "apartamento")]
    Apartment,
    #[serde(rename = "terreno")]
    #[sqlx(rename = "terreno")]
    Land,
    #[serde(rename = "comercial")]
    #[sqlx(rename = "comercial")]
    Commercial,
}

#[derive(Type, Deserialize, Serialize, PartialEq, Eq, Default, Debug, Clone, Copy)]
#[sqlx(type_name = "property_status")]
pub enum PropertyStatus {
    #[default]
    #[serde(rename = "disponivel")]
    #[sqlx(rename = "disponivel")]
    Available,
    #[serde(rename = "alugado")]
    #[sqlx(rename = "alugado")]
    Rented,
    #[serde(rename = "vendido")]
    #[sqlx(rename = "vendido")]
    Sold,
}

/// A property row together with the names of its category and city.
#[derive(FromRow, Deserialize, Serialize, PartialEq, Debug, Clone)]
pub struct Property {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: PropertyKind,
    #[serde(rename = "categoria_id")]
    pub category_id: Option<i64>,
    #[serde(rename = "cidade_id")]
    pub city_id: Option<i64>,
    #[serde(rename = "endereco")]
    pub address: Option<String>,
    #[serde(rename = "valor", serialize_with = "serialize_money")]
    pub price: BigDecimal,
    pub status: PropertyStatus,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "categoria_nome")]
    pub category_name: Option<String>,
    #[serde(rename = "cidade_nome")]
    pub city_name: Option<String>,
    #[serde(rename = "cidade_estado")]
    pub city_state: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    #[serde(rename = "fotos")]
    pub photos: Vec<PhotoOut>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn price_is_written_with_cents() {
        let property = Property {
            id: 1,
            title: "Casa de praia".to_string(),
            description: None,
            kind: PropertyKind::House,
            category_id: None,
            city_id: None,
            address: None,
            price: BigDecimal::from_str("1500.5000").unwrap(),
            status: PropertyStatus::default(),
            created_at: Utc::now(),
            category_name: None,
            city_name: None,
            city_state: None,
        };

        let value = serde_json::to_value(&property).unwrap();

        assert_eq!(value["valor"], "1500.50");
        assert_eq!(value["status"], "disponivel");
    }
}
