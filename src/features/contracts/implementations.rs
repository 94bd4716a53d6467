use std::str::FromStr;

use tracing::warn;

use crate::{
    features::contracts::{
        models::ContractKind,
        schemas::{ContractBody, ContractFilter, ContractFilterQuery, ContractPatch, NewContract},
    },
    utilities::validation::{
        FieldError, RawFieldExt, coerce_id, enum_filter, enum_value, lenient_enum, money,
        optional_date, optional_id_filter,
    },
};

const INVALID_KIND: &str = "Tipo de contrato inválido.";
const INVALID_START_DATE: &str = "Data de início deve estar no formato YYYY-MM-DD.";
const INVALID_END_DATE: &str = "Data de término deve estar no formato YYYY-MM-DD.";

impl FromStr for ContractKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aluguel" => Ok(Self::Rental),
            "venda" => Ok(Self::Sale),
            _ => Err(FieldError::InvalidEnumValue(INVALID_KIND)),
        }
    }
}

fn reference(value: Option<&serde_json::Value>, message: &'static str) -> Result<i64, FieldError> {
    value
        .and_then(coerce_id)
        .ok_or(FieldError::InvalidIdentifier(message))
}

impl ContractBody {
    pub fn into_new_contract(self) -> Result<NewContract, FieldError> {
        let property_id = reference(self.property_id.value(), "Imóvel é obrigatório.")?;
        let user_id = reference(self.user_id.value(), "Usuário é obrigatório.")?;
        let kind = enum_value(self.kind.value(), INVALID_KIND)?;
        let price = money(
            self.price.value(),
            "Valor do contrato é obrigatório e deve ser válido.",
        )?;
        let start_date = optional_date(self.start_date.value(), INVALID_START_DATE)?;
        let end_date = optional_date(self.end_date.value(), INVALID_END_DATE)?;

        Ok(NewContract {
            property_id,
            user_id,
            kind,
            start_date,
            end_date,
            price,
        })
    }

    pub fn into_patch(self) -> Result<ContractPatch, FieldError> {
        let mut patch = ContractPatch::default();

        if let Some(value) = self.property_id.present() {
            patch.property_id = Some(reference(
                Some(value),
                "Imóvel deve ser informado com um identificador numérico.",
            )?);
        }
        if let Some(value) = self.user_id.present() {
            patch.user_id = Some(reference(
                Some(value),
                "Usuário deve ser informado com um identificador numérico.",
            )?);
        }
        if let Some(value) = self.kind.present() {
            patch.kind = lenient_enum(value);
            if patch.kind.is_none() {
                warn!("ignoring invalid tipo_contrato on update: {value}");
            }
        }
        if let Some(value) = self.start_date.present() {
            patch.start_date = Some(optional_date(Some(value), INVALID_START_DATE)?);
        }
        if let Some(value) = self.end_date.present() {
            patch.end_date = Some(optional_date(Some(value), INVALID_END_DATE)?);
        }
        if let Some(value) = self.price.present() {
            patch.price = Some(money(Some(value), "Valor do contrato deve ser válido.")?);
        }

        Ok(patch)
    }
}

impl ContractPatch {
    pub fn is_empty(&self) -> bool {
        self.property_id.is_none()
            && self.user_id.is_none()
            && self.kind.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.price.is_none()
    }
}

impl TryFrom<ContractFilterQuery> for ContractFilter {
    type Error = FieldError;

    fn try_from(query: ContractFilterQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            property_id: optional_id_filter(
                query.imovel_id.as_deref(),
                "Filtro de imóvel deve ser numérico.",
            )?,
            user_id: optional_id_filter(
                query.usuario_id.as_deref(),
                "Filtro de usuário deve ser numérico.",
            )?,
            kind: enum_filter(query.tipo_contrato.as_deref(), INVALID_KIND)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use serde_json::{Value, json};

    use super::*;

    fn body(value: Value) -> ContractBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn create_validates_references_first() {
        let err = body(json!({ "usuario_id": 1 })).into_new_contract().unwrap_err();
        assert_eq!(err.to_string(), "Imóvel é obrigatório.");

        let err = body(json!({ "imovel_id": "2" })).into_new_contract().unwrap_err();
        assert_eq!(err.to_string(), "Usuário é obrigatório.");
    }

    #[test]
    fn create_accepts_blank_dates() {
        let contract = body(json!({
            "imovel_id": 2,
            "usuario_id": 3,
            "tipo_contrato": "Aluguel",
            "valor": 1200,
            "data_inicio": "2025-01-01",
            "data_fim": ""
        }))
        .into_new_contract()
        .unwrap();

        assert_eq!(contract.kind, ContractKind::Rental);
        assert_eq!(contract.start_date.as_deref(), Some("2025-01-01"));
        assert_eq!(contract.end_date, None);
        assert_eq!(contract.price, BigDecimal::from(1200));
    }

    #[test]
    fn create_rejects_malformed_dates_and_kinds() {
        let base = json!({ "imovel_id": 2, "usuario_id": 3, "valor": 10 });

        let mut bad_kind = base.clone();
        bad_kind["tipo_contrato"] = json!("comodato");
        assert_eq!(
            body(bad_kind).into_new_contract().unwrap_err().to_string(),
            INVALID_KIND
        );

        let mut bad_date = base;
        bad_date["tipo_contrato"] = json!("venda");
        bad_date["data_fim"] = json!("01/02/2025");
        assert_eq!(
            body(bad_date).into_new_contract().unwrap_err().to_string(),
            INVALID_END_DATE
        );
    }

    #[test]
    fn patch_clears_dates_and_skips_invalid_kind() {
        let patch = body(json!({ "data_inicio": null, "tipo_contrato": "comodato" }))
            .into_patch()
            .unwrap();

        assert_eq!(patch.start_date, Some(None));
        assert_eq!(patch.kind, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_rejects_non_numeric_references() {
        let err = body(json!({ "usuario_id": "ana" })).into_patch().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Usuário deve ser informado com um identificador numérico."
        );
    }

    #[test]
    fn filters_validate_ids() {
        let filter = ContractFilter::try_from(ContractFilterQuery {
            imovel_id: Some("4".to_string()),
            usuario_id: Some(String::new()),
            tipo_contrato: Some("VENDA".to_string()),
        })
        .unwrap();
        assert_eq!(
            filter,
            ContractFilter {
                property_id: Some(4),
                user_id: None,
                kind: Some(ContractKind::Sale),
            }
        );

        assert!(
            ContractFilter::try_from(ContractFilterQuery {
                imovel_id: Some("x".to_string()),
                ..Default::default()
            })
            .is_err()
        );
    }
}
