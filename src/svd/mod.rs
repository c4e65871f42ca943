//! SVD device editor: XML codec, editable field flattening and the in-memory
//! device copy.

use serde::Serialize;
use thiserror::Error;

pub mod edit;
pub mod model;
#[cfg(feature = "server")]
pub mod store;

pub use model::Device;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SvdError {
    #[error("failed to fetch SVD document: {0}")]
    Fetch(String),

    #[error("SVD server responded with status {0}")]
    Status(u16),

    #[error("failed to parse SVD document: {0}")]
    Parse(String),

    #[error("failed to build SVD document: {0}")]
    Build(String),

    #[error("peripheral {0} not found")]
    PeripheralNotFound(String),
}

pub type SvdResult<T> = Result<T, SvdError>;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

pub fn parse_device(xml: &str) -> SvdResult<Device> {
    quick_xml::de::from_str(xml).map_err(|err| SvdError::Parse(err.to_string()))
}

/// Serializes the device as indented XML with a declaration.
pub fn build_xml(device: &Device) -> SvdResult<String> {
    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    device
        .serialize(serializer)
        .map_err(|err| SvdError::Build(err.to_string()))?;
    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}
