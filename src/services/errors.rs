//! Error type returned by every service function.

use thiserror::Error;

use crate::api::ApiError;
use crate::forms::FieldErrors;
use crate::svd::SvdError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("resource not found")]
    NotFound,

    /// Submitted form failed validation; the messages are shown inline.
    #[error("form validation failed")]
    Validation(FieldErrors),

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("api error: {0}")]
    Api(ApiError),

    #[error("svd error: {0}")]
    Svd(SvdError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
