//! Broadcast composer form.

use std::collections::BTreeMap;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use validator::Validate;

use crate::api::Upload;
use crate::domain::broadcast::NewBroadcast;
use crate::domain::types::{BroadcastText, BroadcastTitle};
use crate::forms::field::{FieldDescriptor, FieldKind};
use crate::forms::{FormError, not_blank, read_uploads};

#[derive(MultipartForm)]
pub struct BroadcastMultipartForm {
    pub title: Option<Text<String>>,
    pub text: Option<Text<String>>,
    #[multipart(limit = "20MB")]
    pub attachments: Vec<TempFile>,
}

impl BroadcastMultipartForm {
    pub fn into_parts(self) -> Result<(BroadcastForm, Vec<Upload>), FormError> {
        let form = BroadcastForm {
            title: self.title.map(Text::into_inner).unwrap_or_default(),
            text: self.text.map(Text::into_inner).unwrap_or_default(),
        };
        Ok((form, read_uploads(self.attachments)?))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BroadcastForm {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

impl BroadcastForm {
    pub fn values(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([("title", self.title.clone()), ("text", self.text.clone())])
    }
}

impl TryFrom<BroadcastForm> for NewBroadcast {
    type Error = FormError;

    fn try_from(form: BroadcastForm) -> Result<Self, Self::Error> {
        Ok(Self {
            title: BroadcastTitle::new(form.title).map_err(|_| FormError::InvalidName)?,
            text: BroadcastText::new(form.text).map_err(|_| FormError::InvalidName)?,
        })
    }
}

pub fn broadcast_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("title", "Тема", FieldKind::Text).required(),
        FieldDescriptor::new("text", "Текст", FieldKind::Textarea).required(),
        FieldDescriptor::new(
            "attachments",
            "Вложения",
            FieldKind::FileUpload {
                accept: String::new(),
                multiple: true,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldErrors;

    #[test]
    fn empty_text_is_rejected() {
        let form = BroadcastForm {
            title: "Новости".to_string(),
            text: "  ".to_string(),
        };
        let errors = FieldErrors::from(form.validate().unwrap_err());
        assert!(errors.contains("text"));
        assert!(!errors.contains("title"));
    }

    #[test]
    fn markup_is_sanitized() {
        let form = BroadcastForm {
            title: "Новости".to_string(),
            text: "<b>Скидки</b><script>alert(1)</script>".to_string(),
        };
        let broadcast = NewBroadcast::try_from(form).unwrap();
        assert_eq!(broadcast.text.as_str(), "<b>Скидки</b>");
    }
}
