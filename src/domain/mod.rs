//! Domain DTOs mirroring the back-office REST payloads.

/// Declares a status enum sent by the backend as a plain string. Values
/// outside the known set are kept in `Other` and written back unchanged.
macro_rules! backend_status {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $raw:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $raw,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($raw => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> Self {
                match status {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }
    };
}

pub mod banner;
pub mod broadcast;
pub mod customer;
pub mod order;
pub mod product;
pub mod product_group;
pub mod refund;
pub mod seller;
pub mod types;
