use std::str::FromStr;

use tracing::warn;

use crate::{
    features::properties::{
        models::{PropertyKind, PropertyStatus},
        schemas::{NewProperty, PropertyBody, PropertyFilter, PropertyFilterQuery, PropertyPatch},
    },
    utilities::validation::{
        FieldError, RawFieldExt, enum_filter, enum_value, lenient_enum, money, money_filter,
        optional_enum, optional_reference, optional_string, parse_id, required_string,
    },
};

const INVALID_KIND: &str = "Tipo de imóvel inválido.";
const INVALID_STATUS: &str = "Status de imóvel inválido.";
const INVALID_CATEGORY: &str = "Categoria deve ser informada com um identificador numérico.";
const INVALID_CITY: &str = "Cidade deve ser informada com um identificador numérico.";

impl FromStr for PropertyKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "casa" => Ok(Self::House),
            "apartamento" => Ok(Self::Apartment),
            "terreno" => Ok(Self::Land),
            "comercial" => Ok(Self::Commercial),
            _ => Err(FieldError::InvalidEnumValue(INVALID_KIND)),
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disponivel" => Ok(Self::Available),
            "alugado" => Ok(Self::Rented),
            "vendido" => Ok(Self::Sold),
            _ => Err(FieldError::InvalidEnumValue(INVALID_STATUS)),
        }
    }
}

impl PropertyBody {
    pub fn into_new_property(self) -> Result<NewProperty, FieldError> {
        let kind = enum_value(
            self.kind.value(),
            "Tipo de imóvel é obrigatório e deve ser válido.",
        )?;
        let status = optional_enum(self.status.value(), INVALID_STATUS)?.unwrap_or_default();
        let title = required_string(self.title.value(), "Título é obrigatório.")?;
        let price = money(
            self.price.value(),
            "Valor do imóvel é obrigatório e deve ser válido.",
        )?;
        let category_id = match self.category_id.present() {
            Some(value) => optional_reference(value, INVALID_CATEGORY)?,
            None => None,
        };
        let city_id = match self.city_id.present() {
            Some(value) => optional_reference(value, INVALID_CITY)?,
            None => None,
        };

        Ok(NewProperty {
            title,
            description: optional_string(self.description.value()),
            kind,
            category_id,
            city_id,
            address: optional_string(self.address.value()),
            price,
            status,
        })
    }

    pub fn into_patch(self) -> Result<PropertyPatch, FieldError> {
        let mut patch = PropertyPatch::default();

        if let Some(value) = self.title.present() {
            patch.title = Some(required_string(Some(value), "Título não pode ser vazio.")?);
        }
        if let Some(value) = self.description.present() {
            patch.description = Some(optional_string(Some(value)));
        }
        if let Some(value) = self.kind.present() {
            patch.kind = lenient_enum(value);
            if patch.kind.is_none() {
                warn!("ignoring invalid tipo on property update: {value}");
            }
        }
        if let Some(value) = self.category_id.present() {
            patch.category_id = Some(optional_reference(value, INVALID_CATEGORY)?);
        }
        if let Some(value) = self.city_id.present() {
            patch.city_id = Some(optional_reference(value, INVALID_CITY)?);
        }
        if let Some(value) = self.address.present() {
            patch.address = Some(optional_string(Some(value)));
        }
        if let Some(value) = self.price.present() {
            patch.price = Some(money(Some(value), "Valor do imóvel deve ser válido.")?);
        }
        if let Some(value) = self.status.present() {
            patch.status = lenient_enum(value);
            if patch.status.is_none() {
                warn!("ignoring invalid status on property update: {value}");
            }
        }

        Ok(patch)
    }
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.kind.is_none()
            && self.category_id.is_none()
            && self.city_id.is_none()
            && self.address.is_none()
            && self.price.is_none()
            && self.status.is_none()
    }
}

impl TryFrom<PropertyFilterQuery> for PropertyFilter {
    type Error = FieldError;

    fn try_from(query: PropertyFilterQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: enum_filter(query.tipo.as_deref(), INVALID_KIND)?,
            status: enum_filter(query.status.as_deref(), INVALID_STATUS)?,
            category_id: query.categoria_id.as_deref().and_then(parse_id),
            city_id: query.cidade_id.as_deref().and_then(parse_id),
            min_price: money_filter(query.valor_min.as_deref()),
            max_price: money_filter(query.valor_max.as_deref()),
            search: query.busca.filter(|term| !term.is_empty()),
        })
    }
}

/// Escapes `LIKE` wildcards so the term matches literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
