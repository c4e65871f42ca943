//! Conversions from lower layer errors into [`ServiceError`].
//!
//! Kept outside `services` so the domain, API and SVD layers stay unaware of
//! the service error type.

use crate::api::ApiError;
use crate::domain::types::TypeConstraintError;
use crate::forms::{FieldErrors, FormError};
use crate::services::ServiceError;
use crate::svd::SvdError;
use crate::table::export::ExportError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<ApiError> for ServiceError {
    fn from(val: ApiError) -> Self {
        if val.is_not_found() {
            ServiceError::NotFound
        } else {
            ServiceError::Api(val)
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        match val {
            FormError::Validation(errors) => ServiceError::Validation(FieldErrors::from(&errors)),
            other => ServiceError::Form(other.to_string()),
        }
    }
}

impl From<SvdError> for ServiceError {
    fn from(val: SvdError) -> Self {
        match val {
            SvdError::PeripheralNotFound(_) => ServiceError::NotFound,
            other => ServiceError::Svd(other),
        }
    }
}

impl From<ExportError> for ServiceError {
    fn from(val: ExportError) -> Self {
        ServiceError::Internal(val.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;

    #[test]
    fn not_found_api_errors_become_not_found() {
        let err = ServiceError::from(ApiError::new(ApiErrorKind::NotFound, "missing"));
        assert!(matches!(err, ServiceError::NotFound));

        let err = ServiceError::from(ApiError::new(ApiErrorKind::Server, "boom"));
        assert!(matches!(err, ServiceError::Api(_)));
    }

    #[test]
    fn form_validation_keeps_field_messages() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("title", validator::ValidationError::new("required"));
        let err = ServiceError::from(FormError::Validation(errors));
        match err {
            ServiceError::Validation(fields) => assert!(fields.contains("title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
