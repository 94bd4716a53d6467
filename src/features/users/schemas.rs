use serde::Deserialize;

use crate::{features::users::models::UserRole, utilities::validation::RawField};

/// Body of `POST /usuarios` and `PUT /usuarios/{id}`.
#[derive(Deserialize, Debug, Default)]
pub struct UserBody {
    #[serde(default, rename = "nome", with = "::serde_with::rust::double_option")]
    pub name: RawField,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub email: RawField,
    #[serde(default, rename = "telefone", with = "::serde_with::rust::double_option")]
    pub phone: RawField,
    #[serde(default, rename = "tipo_usuario", with = "::serde_with::rust::double_option")]
    pub role: RawField,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub role: Option<UserRole>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UserFilterQuery {
    pub tipo_usuario: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
}
