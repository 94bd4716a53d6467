use serde::Deserialize;

use crate::utilities::validation::RawField;

#[derive(Deserialize, Debug, Default)]
pub struct CityBody {
    #[serde(default, rename = "nome", with = "::serde_with::rust::double_option")]
    pub name: RawField,
    #[serde(default, rename = "estado", with = "::serde_with::rust::double_option")]
    pub state: RawField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCity {
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityPatch {
    pub name: Option<String>,
    pub state: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CityFilterQuery {
    pub estado: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    pub state: Option<String>,
}
