//! Form definitions backing the admin routes.
//!
//! Every form is a plain `Deserialize + Validate` struct. Validation failures
//! are turned into [`FieldErrors`] and rendered inline next to the fields;
//! valid forms convert into typed payloads via `TryFrom`.

use std::collections::BTreeMap;

use actix_multipart::form::tempfile::TempFile;
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::api::Upload;

pub mod banners;
pub mod broadcasts;
pub mod field;
pub mod product_groups;
pub mod sellers;
pub mod svd;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid slug")]
    InvalidSlug,

    #[error("invalid id")]
    InvalidId,

    #[error("number out of range")]
    OutOfRange,

    #[error("failed to read uploaded file: {0}")]
    Upload(String),

    #[error("malformed form data: {0}")]
    Malformed(String),
}

/// Key under which `validator` stores struct-level errors.
const FORM_LEVEL_KEY: &str = "__all__";

/// Validation messages per field, ready to be shown next to the inputs.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Errors not tied to a single field.
    pub fn general(&self) -> &[String] {
        self.get(FORM_LEVEL_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut result = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                result.add(&field, error_message(error));
            }
        }
        result
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        Self::from(&errors)
    }
}

/// Human readable message for a validation error code.
pub fn error_message(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "required" => "Обязательное поле".to_string(),
        "length" => match error.params.get("min").and_then(|min| min.as_u64()) {
            Some(min) if min > 1 => format!("Минимум {min} символов"),
            _ => "Обязательное поле".to_string(),
        },
        "email" => "Некорректный email".to_string(),
        "url" => "Некорректная ссылка".to_string(),
        "slug" => "Только строчные латинские буквы, цифры и дефис".to_string(),
        "phone" => "Некорректный номер телефона".to_string(),
        "must_match" => "Пароли не совпадают".to_string(),
        "range" => "Значение вне допустимого диапазона".to_string(),
        "integer" => "Введите целое число".to_string(),
        _ => "Некорректное значение".to_string(),
    }
}

/// Field validator rejecting blank strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// Field validator accepting blank values or integers.
pub fn optional_integer(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.parse::<i64>().is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("integer"))
    }
}

/// Parses an optional integer field already accepted by [`optional_integer`].
pub fn parse_optional_integer(value: &str) -> Result<Option<i64>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| FormError::InvalidId)
}

/// Merges the derived validation result with extra cross-field errors.
pub(crate) fn merge_errors(
    derived: Result<(), ValidationErrors>,
    extra: Vec<(&'static str, ValidationError)>,
) -> Result<(), ValidationErrors> {
    let mut errors = derived.err().unwrap_or_default();
    for (field, error) in extra {
        errors.add(field, error);
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Interprets an HTML checkbox value.
pub fn is_checked(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("on" | "true" | "1" | "yes"))
}

/// Reads uploaded temp files into memory, skipping empty file inputs.
pub fn read_uploads(files: Vec<TempFile>) -> Result<Vec<Upload>, FormError> {
    files
        .into_iter()
        .filter(|file| file.size > 0)
        .map(|file| {
            let bytes =
                std::fs::read(file.file.path()).map_err(|err| FormError::Upload(err.to_string()))?;
            Ok(Upload {
                file_name: file.file_name.unwrap_or_else(|| "file".to_string()),
                content_type: file.content_type.map(|mime| mime.to_string()),
                bytes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_follow_error_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("title", ValidationError::new("required"));
        errors.add("email", ValidationError::new("email"));
        errors.add("repeat_password", ValidationError::new("must_match"));

        let fields = FieldErrors::from(&errors);
        assert_eq!(fields.get("title"), ["Обязательное поле".to_string()]);
        assert_eq!(fields.get("email"), ["Некорректный email".to_string()]);
        assert_eq!(
            fields.get("repeat_password"),
            ["Пароли не совпадают".to_string()]
        );
        assert!(fields.get("phone").is_empty());
    }

    #[test]
    fn explicit_message_wins() {
        let error = ValidationError::new("custom").with_message("Свое сообщение".into());
        assert_eq!(error_message(&error), "Свое сообщение");
    }

    #[test]
    fn merge_keeps_both_sources() {
        let mut derived = ValidationErrors::new();
        derived.add("title", ValidationError::new("required"));
        let merged = merge_errors(
            Err(derived),
            vec![("btn_text", ValidationError::new("required"))],
        )
        .unwrap_err();
        let fields = FieldErrors::from(&merged);
        assert!(fields.contains("title"));
        assert!(fields.contains("btn_text"));

        assert!(merge_errors(Ok(()), vec![]).is_ok());
    }

    #[test]
    fn checkbox_values() {
        assert!(is_checked(Some("on")));
        assert!(is_checked(Some("true")));
        assert!(!is_checked(Some("")));
        assert!(!is_checked(None));
    }
}
