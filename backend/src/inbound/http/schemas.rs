//! OpenAPI schema definitions for domain error types.
//!
//! Domain types stay framework agnostic and do not derive `ToSchema`; the
//! wrappers here mirror their wire shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input, a bad path segment or a failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Unknown user or medicine.
    #[schema(rename = "not_found")]
    NotFound,
    /// Duplicate user or medicine id.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    #[schema(example = "medicine 3 not found for user 7")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "end_date", "code": "invalid_value"}`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_is_named_after_domain_type() {
        assert_eq!(ErrorSchema::name(), "domain.Error");
        let schema_json = schema_to_json::<ErrorSchema>();
        for field in ["code", "message", "trace_id", "details"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        assert_eq!(ErrorCodeSchema::name(), "domain.ErrorCode");
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }
}
