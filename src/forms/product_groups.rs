//! Product group create/edit form.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::product_group::{NewProductGroup, ProductGroup};
use crate::domain::types::{ProductGroupId, ProductGroupName, Slug, is_slug};
use crate::forms::field::{FieldDescriptor, FieldKind};
use crate::forms::{FormError, is_checked, not_blank, optional_integer, parse_optional_integer};

/// Endpoint feeding the parent group autocomplete.
pub const PARENT_OPTIONS_URL: &str = "/product-groups/options";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductGroupForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[serde(default)]
    #[validate(custom(function = "optional_integer"))]
    pub parent_id: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else if is_slug(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("slug"))
    }
}

impl ProductGroupForm {
    pub fn from_group(group: &ProductGroup) -> Self {
        Self {
            name: group.name.clone(),
            slug: group.slug.clone().unwrap_or_default(),
            parent_id: group
                .parent_id
                .map(|id| id.get().to_string())
                .unwrap_or_default(),
            is_active: group.is_active.then(|| "on".to_string()),
        }
    }

    pub fn values(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", self.name.clone()),
            ("slug", self.slug.clone()),
            ("parent_id", self.parent_id.clone()),
            ("is_active", self.is_active.clone().unwrap_or_default()),
        ])
    }
}

impl TryFrom<ProductGroupForm> for NewProductGroup {
    type Error = FormError;

    fn try_from(form: ProductGroupForm) -> Result<Self, Self::Error> {
        let parent_id = parse_optional_integer(&form.parent_id)?
            .map(ProductGroupId::new)
            .transpose()
            .map_err(|_| FormError::InvalidId)?;

        Ok(Self {
            name: ProductGroupName::new(form.name).map_err(|_| FormError::InvalidName)?,
            slug: Slug::new(form.slug).map_err(|_| FormError::InvalidSlug)?,
            parent_id,
            is_active: is_checked(form.is_active.as_deref()),
        })
    }
}

pub fn product_group_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("name", "Название", FieldKind::Text).required(),
        FieldDescriptor::new("slug", "Слаг", FieldKind::Text)
            .required()
            .placeholder("summer-sale"),
        FieldDescriptor::new(
            "parent_id",
            "Родительская группа",
            FieldKind::Autocomplete {
                source: PARENT_OPTIONS_URL.to_string(),
            },
        ),
        FieldDescriptor::new("is_active", "Активна", FieldKind::Switcher),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldErrors;

    #[test]
    fn slug_pattern_is_enforced() {
        let form = ProductGroupForm {
            name: "Обувь".to_string(),
            slug: "Обувь Летняя".to_string(),
            ..Default::default()
        };
        let errors = FieldErrors::from(form.validate().unwrap_err());
        assert_eq!(
            errors.get("slug"),
            ["Только строчные латинские буквы, цифры и дефис".to_string()]
        );
    }

    #[test]
    fn converts_with_parent() {
        let form = ProductGroupForm {
            name: "Кеды".to_string(),
            slug: "kedy-2024".to_string(),
            parent_id: "12".to_string(),
            is_active: Some("on".to_string()),
        };
        assert!(form.validate().is_ok());

        let group = NewProductGroup::try_from(form).unwrap();
        assert_eq!(group.parent_id.map(|id| id.get()), Some(12));
        assert!(group.is_active);
    }

    #[test]
    fn zero_parent_is_rejected() {
        let form = ProductGroupForm {
            name: "Кеды".to_string(),
            slug: "kedy".to_string(),
            parent_id: "0".to_string(),
            is_active: None,
        };
        assert!(matches!(
            NewProductGroup::try_from(form),
            Err(FormError::InvalidId)
        ));
    }
}
