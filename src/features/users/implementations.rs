use std::str::FromStr;

use tracing::warn;

use crate::{
    features::users::{
        models::UserRole,
        schemas::{NewUser, UserBody, UserFilter, UserFilterQuery, UserPatch},
    },
    utilities::validation::{
        FieldError, RawFieldExt, enum_filter, lenient_enum, optional_enum, optional_string,
        required_string,
    },
};

const INVALID_ROLE: &str = "Tipo de usuário inválido.";
const NAME_AND_EMAIL_REQUIRED: &str = "Nome e e-mail são obrigatórios.";

impl FromStr for UserRole {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "cliente" => Ok(Self::Client),
            "corretor" => Ok(Self::Broker),
            _ => Err(FieldError::InvalidEnumValue(INVALID_ROLE)),
        }
    }
}

impl UserBody {
    pub fn into_new_user(self) -> Result<NewUser, FieldError> {
        let name = required_string(self.name.value(), NAME_AND_EMAIL_REQUIRED)?;
        let email = required_string(self.email.value(), NAME_AND_EMAIL_REQUIRED)?;
        let role = optional_enum(self.role.value(), INVALID_ROLE)?.unwrap_or_default();

        Ok(NewUser {
            name,
            email,
            phone: optional_string(self.phone.value()),
            role,
        })
    }

    pub fn into_patch(self) -> Result<UserPatch, FieldError> {
        let mut patch = UserPatch::default();

        if let Some(value) = self.name.present() {
            patch.name = Some(required_string(Some(value), "Nome não pode ser vazio.")?);
        }
        if let Some(value) = self.email.present() {
            patch.email = Some(required_string(Some(value), "E-mail não pode ser vazio.")?);
        }
        if let Some(value) = self.phone.present() {
            patch.phone = Some(optional_string(Some(value)));
        }
        if let Some(value) = self.role.present() {
            patch.role = lenient_enum(value);
            if patch.role.is_none() {
                warn!("ignoring invalid tipo_usuario on update: {value}");
            }
        }

        Ok(patch)
    }
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.role.is_none()
    }
}

impl TryFrom<UserFilterQuery> for UserFilter {
    type Error = FieldError;

    fn try_from(query: UserFilterQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            role: enum_filter(query.tipo_usuario.as_deref(), INVALID_ROLE)?,
        })
    }
}
