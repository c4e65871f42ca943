//! Banner create/edit form.

use std::collections::BTreeMap;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::api::Upload;
use crate::domain::banner::{Banner, NewBanner};
use crate::domain::types::{BannerTitle, ButtonText, LinkUrl};
use crate::forms::field::{FieldDescriptor, FieldKind};
use crate::forms::{
    FormError, is_checked, merge_errors, not_blank, optional_integer, parse_optional_integer,
};

/// Multipart body posted by the banner editor.
#[derive(MultipartForm)]
pub struct BannerMultipartForm {
    pub title: Option<Text<String>>,
    pub link: Option<Text<String>>,
    pub position: Option<Text<String>>,
    pub is_active: Option<Text<String>>,
    pub has_btn: Option<Text<String>>,
    pub btn_text: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
}

impl BannerMultipartForm {
    /// Splits the body into the validated fields and the image uploads.
    pub fn into_parts(self) -> Result<(BannerForm, Vec<Upload>), FormError> {
        let text = |field: Option<Text<String>>| field.map(Text::into_inner).unwrap_or_default();

        let form = BannerForm {
            title: text(self.title),
            link: text(self.link),
            position: text(self.position),
            is_active: is_checked(self.is_active.as_deref().map(String::as_str)),
            has_btn: is_checked(self.has_btn.as_deref().map(String::as_str)),
            btn_text: text(self.btn_text),
        };
        let uploads = crate::forms::read_uploads(self.images)?;
        Ok((form, uploads))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BannerForm {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "optional_link"))]
    pub link: String,
    #[serde(default)]
    #[validate(custom(function = "optional_position"))]
    pub position: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub has_btn: bool,
    #[serde(default)]
    pub btn_text: String,
}

fn optional_link(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || LinkUrl::new(value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

/// Blank, or an integer the backend stores as a 32-bit position.
fn optional_position(value: &str) -> Result<(), ValidationError> {
    optional_integer(value)?;
    match parse_optional_integer(value) {
        Ok(Some(position)) if i32::try_from(position).is_err() => {
            Err(ValidationError::new("range"))
        }
        _ => Ok(()),
    }
}

impl BannerForm {
    /// Field rules plus the button rule: a banner with a button needs its text.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut extra = Vec::new();
        if self.has_btn && self.btn_text.trim().is_empty() {
            extra.push(("btn_text", ValidationError::new("required")));
        }
        merge_errors(self.validate(), extra)
    }

    pub fn from_banner(banner: &Banner) -> Self {
        Self {
            title: banner.title.clone(),
            link: banner.link.clone().unwrap_or_default(),
            position: banner.position.map(|p| p.to_string()).unwrap_or_default(),
            is_active: banner.is_active,
            has_btn: banner.has_btn,
            btn_text: banner.btn_text.clone().unwrap_or_default(),
        }
    }

    /// Current values keyed by field name, for redisplaying the form.
    pub fn values(&self) -> BTreeMap<&'static str, String> {
        let flag = |value: bool| if value { "on" } else { "" }.to_string();
        BTreeMap::from([
            ("title", self.title.clone()),
            ("link", self.link.clone()),
            ("position", self.position.clone()),
            ("is_active", flag(self.is_active)),
            ("has_btn", flag(self.has_btn)),
            ("btn_text", self.btn_text.clone()),
        ])
    }
}

impl TryFrom<BannerForm> for NewBanner {
    type Error = FormError;

    fn try_from(form: BannerForm) -> Result<Self, Self::Error> {
        let link = match form.link.trim() {
            "" => None,
            link => Some(LinkUrl::new(link).map_err(|_| FormError::InvalidUrl)?),
        };
        let btn_text = if form.has_btn {
            Some(ButtonText::new(form.btn_text).map_err(|_| FormError::InvalidName)?)
        } else {
            None
        };
        let position = match parse_optional_integer(&form.position)? {
            Some(position) => i32::try_from(position).map_err(|_| FormError::OutOfRange)?,
            None => 0,
        };

        Ok(Self {
            title: BannerTitle::new(form.title).map_err(|_| FormError::InvalidName)?,
            link,
            position,
            is_active: form.is_active,
            has_btn: form.has_btn,
            btn_text,
        })
    }
}

pub fn banner_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("title", "Заголовок", FieldKind::Text).required(),
        FieldDescriptor::new("link", "Ссылка", FieldKind::Text).placeholder("https://"),
        FieldDescriptor::new("position", "Позиция", FieldKind::Number),
        FieldDescriptor::new("is_active", "Активен", FieldKind::Switcher),
        FieldDescriptor::new("has_btn", "Показывать кнопку", FieldKind::Switcher),
        FieldDescriptor::new("btn_text", "Текст кнопки", FieldKind::Text),
        FieldDescriptor::new(
            "images",
            "Изображения",
            FieldKind::FileUpload {
                accept: "image/*".to_string(),
                multiple: true,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldErrors;

    fn form() -> BannerForm {
        BannerForm {
            title: "Весенняя распродажа".to_string(),
            link: "https://shop.example.com/sale".to_string(),
            position: "2".to_string(),
            is_active: true,
            has_btn: false,
            btn_text: String::new(),
        }
    }

    #[test]
    fn button_requires_text() {
        let form = BannerForm {
            has_btn: true,
            ..form()
        };
        let errors = FieldErrors::from(form.check().unwrap_err());
        assert_eq!(errors.get("btn_text"), ["Обязательное поле".to_string()]);
        assert!(!errors.contains("title"));
    }

    #[test]
    fn blank_title_and_bad_link_are_reported() {
        let form = BannerForm {
            title: "   ".to_string(),
            link: "not a link".to_string(),
            position: "first".to_string(),
            ..form()
        };
        let errors = FieldErrors::from(form.check().unwrap_err());
        assert!(errors.contains("title"));
        assert!(errors.contains("link"));
        assert_eq!(errors.get("position"), ["Введите целое число".to_string()]);
    }

    #[test]
    fn valid_form_converts_to_payload() {
        let form = BannerForm {
            has_btn: true,
            btn_text: " Купить ".to_string(),
            ..form()
        };
        assert!(form.check().is_ok());

        let banner = NewBanner::try_from(form).unwrap();
        assert_eq!(banner.title.as_str(), "Весенняя распродажа");
        assert_eq!(banner.position, 2);
        assert_eq!(banner.btn_text.as_ref().map(|t| t.as_str()), Some("Купить"));
    }

    #[test]
    fn position_beyond_i32_is_a_field_error() {
        let form = BannerForm {
            position: "3000000000".to_string(),
            ..form()
        };
        let errors = FieldErrors::from(form.clone().check().unwrap_err());
        assert_eq!(
            errors.get("position"),
            ["Значение вне допустимого диапазона".to_string()]
        );
        assert!(matches!(
            NewBanner::try_from(form),
            Err(FormError::OutOfRange)
        ));
    }

    #[test]
    fn button_text_is_dropped_without_button() {
        let form = BannerForm {
            btn_text: "Купить".to_string(),
            link: String::new(),
            ..form()
        };
        let banner = NewBanner::try_from(form).unwrap();
        assert!(banner.btn_text.is_none());
        assert!(banner.link.is_none());
    }
}
