//! Seller registration form.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::seller::NewSeller;
use crate::domain::types::{Email, PhoneNumber, SellerName, is_phone};
use crate::forms::field::{FieldDescriptor, FieldKind};
use crate::forms::{FormError, not_blank};

#[derive(Clone, Default, Deserialize, Validate)]
pub struct SellerForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "optional_phone"))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub repeat_password: String,
}

fn optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || is_phone(value) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

impl SellerForm {
    /// Values redisplayed after a failed submission. Passwords are never echoed.
    pub fn values(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
        ])
    }
}

impl TryFrom<SellerForm> for NewSeller {
    type Error = FormError;

    fn try_from(form: SellerForm) -> Result<Self, Self::Error> {
        let phone = match form.phone.trim() {
            "" => None,
            phone => Some(PhoneNumber::new(phone).map_err(|_| FormError::InvalidPhoneNumber)?),
        };

        Ok(Self {
            name: SellerName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            phone,
            password: form.password,
        })
    }
}

pub fn seller_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("name", "Название", FieldKind::Text).required(),
        FieldDescriptor::new("email", "Email", FieldKind::Text)
            .required()
            .placeholder("seller@example.com"),
        FieldDescriptor::new("phone", "Телефон", FieldKind::Text).placeholder("+7 (900) 000-00-00"),
        FieldDescriptor::new("password", "Пароль", FieldKind::Password).required(),
        FieldDescriptor::new("repeat_password", "Повторите пароль", FieldKind::Password).required(),
    ]
}
