//! Formatting of domain failures into GraphQL errors.

use async_graphql::{Error, ErrorExtensions};

use postboard_core::DomainError;
use postboard_shared::{ErrorResponse, FieldMessage};

/// The `{message, code, data?}` shape for a domain failure.
pub fn error_response(err: &DomainError) -> ErrorResponse {
    match err {
        DomainError::Internal(detail) => {
            tracing::error!("Internal error: {}", detail);
            ErrorResponse::internal_error()
        }
        _ => {
            let data = err
                .field_errors()
                .iter()
                .map(|e| FieldMessage {
                    message: e.message.clone(),
                })
                .collect();
            ErrorResponse::new(err.status_code().unwrap_or(500), err.to_string()).with_data(data)
        }
    }
}

/// Convert a domain failure into a GraphQL error carrying `code` and `data` extensions.
pub fn graphql_error(err: DomainError) -> Error {
    let response = error_response(&err);
    Error::new(response.message.clone()).extend_with(|_, ext| {
        ext.set("code", i32::from(response.code));
        if let Some(data) = &response.data {
            if let Ok(value) = async_graphql::to_value(data) {
                ext.set("data", value);
            }
        }
    })
}
