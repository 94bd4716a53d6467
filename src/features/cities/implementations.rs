use serde_json::Value;

use crate::{
    features::cities::schemas::{CityBody, CityFilter, CityFilterQuery, CityPatch, NewCity},
    utilities::validation::{
        FieldError, RawFieldExt, is_state_code, normalize_state, required_string,
    },
};

const NAME_AND_STATE_REQUIRED: &str = "Nome e estado são obrigatórios.";
const INVALID_STATE: &str = "Estado deve ser informado com duas letras.";

fn state_code(value: &Value) -> Result<String, FieldError> {
    value
        .as_str()
        .map(normalize_state)
        .filter(|state| is_state_code(state))
        .ok_or(FieldError::InvalidEnumValue(INVALID_STATE))
}

impl CityBody {
    pub fn into_new_city(self) -> Result<NewCity, FieldError> {
        let name = required_string(self.name.value(), NAME_AND_STATE_REQUIRED)?;
        let state = self
            .state
            .value()
            .filter(|value| value.as_str().is_some_and(|text| !text.is_empty()))
            .ok_or(FieldError::MissingRequiredField(NAME_AND_STATE_REQUIRED))?;
        let state = state_code(state)?;

        Ok(NewCity { name, state })
    }

    pub fn into_patch(self) -> Result<CityPatch, FieldError> {
        let mut patch = CityPatch::default();

        if let Some(value) = self.name.present() {
            patch.name = Some(required_string(Some(value), "Nome não pode ser vazio.")?);
        }
        if let Some(value) = self.state.present() {
            patch.state = Some(state_code(value)?);
        }

        Ok(patch)
    }
}

impl CityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.state.is_none()
    }
}

impl TryFrom<CityFilterQuery> for CityFilter {
    type Error = FieldError;

    fn try_from(query: CityFilterQuery) -> Result<Self, Self::Error> {
        let state = match query.estado.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(state_code(&Value::String(raw.to_string()))?),
        };
        Ok(Self { state })
    }
}
