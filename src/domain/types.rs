//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email) so that once a value reaches the API layer it
//! can be treated as trusted.
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Provided url failed format validation.
    #[error("invalid url address")]
    InvalidUrl,
    /// Slug contained characters outside `[a-z0-9-]`.
    #[error("invalid slug")]
    InvalidSlug,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(BannerId, "Unique identifier for a promo banner.");
id_newtype!(BannerFileId, "Unique identifier for a file attached to a banner.");
id_newtype!(ProductId, "Unique identifier for a catalog product.");
id_newtype!(ProductGroupId, "Unique identifier for a catalog product group.");
id_newtype!(OrderId, "Unique identifier for an order.");
id_newtype!(CustomerId, "Unique identifier for a customer.");
id_newtype!(RefundId, "Unique identifier for a refund request.");
id_newtype!(SellerId, "Unique identifier for a marketplace seller.");
id_newtype!(BroadcastId, "Unique identifier for a broadcast message.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

non_empty_string_newtype!(BannerTitle, "Banner headline enforcing non-empty values.");
non_empty_string_newtype!(
    ButtonText,
    "Call-to-action label shown on a banner button."
);
non_empty_string_newtype!(
    ProductGroupName,
    "Catalog group name enforcing non-empty values."
);
non_empty_string_newtype!(SellerName, "Seller display name enforcing non-empty values.");
non_empty_string_newtype!(
    BroadcastTitle,
    "Broadcast subject enforcing trimmed, non-empty values."
);

/// Broadcast body sanitized of any markup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BroadcastText(String);

impl BroadcastText {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `true` when the value is a lowercase slug: `[a-z0-9]` words joined by `-`.
pub fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

/// URL-safe identifier of a product group.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into().trim().to_string();
        if is_slug(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidSlug)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `true` when the value looks like a phone number: an optional leading
/// `+`, separators `space ( ) -`, and 10 to 15 digits.
pub fn is_phone(value: &str) -> bool {
    let trimmed = value.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut digits = 0;
    for ch in body.chars() {
        match ch {
            '0'..='9' => digits += 1,
            ' ' | '(' | ')' | '-' => {}
            _ => return false,
        }
    }
    (10..=15).contains(&digits)
}

/// Phone number reduced to `+` and digits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validates the phone number and strips formatting characters.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if !is_phone(&value) {
            return Err(TypeConstraintError::InvalidPhone);
        }
        let digits: String = value.chars().filter(char::is_ascii_digit).collect();
        Ok(Self(format!("+{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Non-empty, trimmed absolute link.
pub struct LinkUrl(String);

impl LinkUrl {
    /// Ensures a trimmed URL is non-empty and well formed before wrapping.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let url = NonEmptyString::new(value)?;

        if !url.as_str().validate_url() {
            Err(TypeConstraintError::InvalidUrl)
        } else {
            Ok(Self(url.into_inner()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(BannerId::new(1).is_ok());
        assert_eq!(ProductGroupId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(OrderId::new(-4), Err(TypeConstraintError::NonPositiveId));
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let id: ProductGroupId = serde_json::from_str("7").unwrap();
        assert_eq!(id.get(), 7);
        assert!(serde_json::from_str::<ProductGroupId>("0").is_err());
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  Seller@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "seller@example.com");
        assert!(Email::new("not-an-email").is_err());
    }

    #[test]
    fn slug_rules() {
        assert!(is_slug("summer-sale-2024"));
        assert!(!is_slug("Summer"));
        assert!(!is_slug("double--dash"));
        assert!(!is_slug("-leading"));
        assert!(!is_slug(""));
    }

    #[test]
    fn phone_is_reduced_to_digits() {
        let phone = PhoneNumber::new("+7 (912) 345-67-89").unwrap();
        assert_eq!(phone.as_str(), "+79123456789");
        assert_eq!(PhoneNumber::new("12345"), Err(TypeConstraintError::InvalidPhone));
        assert_eq!(PhoneNumber::new("+7 912 abc"), Err(TypeConstraintError::InvalidPhone));
    }

    #[test]
    fn broadcast_text_is_sanitized() {
        let text = BroadcastText::new("<script>alert(1)</script>Hello").unwrap();
        assert_eq!(text.as_str(), "Hello");
        assert!(BroadcastText::new("<script>x</script>").is_err());
    }

    #[test]
    fn link_requires_valid_url() {
        assert!(LinkUrl::new("https://shop.example.com/sale").is_ok());
        assert_eq!(LinkUrl::new("  "), Err(TypeConstraintError::EmptyString));
        assert_eq!(LinkUrl::new("not a url"), Err(TypeConstraintError::InvalidUrl));
    }
}
