use serde::Deserialize;

use crate::utilities::validation::RawField;

#[derive(Deserialize, Debug, Default)]
pub struct CategoryBody {
    #[serde(default, rename = "nome", with = "::serde_with::rust::double_option")]
    pub name: RawField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
}
