use crate::{
    features::categories::schemas::{CategoryBody, CategoryPatch, NewCategory},
    utilities::validation::{FieldError, RawFieldExt, required_string},
};

const NAME_REQUIRED: &str = "Nome da categoria é obrigatório.";

impl CategoryBody {
    pub fn into_new_category(self) -> Result<NewCategory, FieldError> {
        Ok(NewCategory {
            name: required_string(self.name.value(), NAME_REQUIRED)?,
        })
    }

    pub fn into_patch(self) -> Result<CategoryPatch, FieldError> {
        let name = match self.name.present() {
            Some(value) => Some(required_string(Some(value), NAME_REQUIRED)?),
            None => None,
        };
        Ok(CategoryPatch { name })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        let body: CategoryBody = serde_json::from_value(json!({ "nome": "  Luxo " })).unwrap();
        assert_eq!(body.into_new_category().unwrap().name, "Luxo");

        let body: CategoryBody = serde_json::from_value(json!({ "nome": "" })).unwrap();
        assert_eq!(
            body.into_new_category().unwrap_err().to_string(),
            NAME_REQUIRED
        );
    }

    #[test]
    fn patch_rejects_null_name_and_allows_absent() {
        let body: CategoryBody = serde_json::from_value(json!({ "nome": null })).unwrap();
        assert!(body.into_patch().is_err());

        let body: CategoryBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.into_patch().unwrap(), CategoryPatch::default());
    }
}
