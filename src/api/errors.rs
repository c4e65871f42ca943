use thiserror::Error;

/// Failure category of a REST call, derived from the HTTP status or from the
/// transport failure itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Unprocessable,
    Server,
    Network,
    Decode,
}

impl ApiErrorKind {
    /// Maps a non-success HTTP status to an error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::Unprocessable,
            400..=499 => Self::BadRequest,
            _ => Self::Server,
        }
    }
}

/// Typed error returned by every API call. Callers decide how to surface it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::new(ApiErrorKind::Decode, err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::new(ApiErrorKind::from_status(status.as_u16()), err.to_string())
        } else {
            ApiError::new(ApiErrorKind::Network, err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
