//! Extractor configuration that routes malformed input into the domain error
//! envelope instead of actix's plain-text defaults.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::Error;

fn rejected(source: &'static str, reason: String) -> actix_web::Error {
    Error::invalid_request(format!("invalid {source}: {reason}"))
        .with_details(json!({ "source": source, "code": "malformed" }))
        .into()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let reason = match &err {
        JsonPayloadError::Deserialize(inner) => inner.to_string(),
        JsonPayloadError::ContentType => "expected application/json".to_owned(),
        other => other.to_string(),
    };
    rejected("body", reason)
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    rejected("path", err.to_string())
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected("query", err.to_string())
}

/// JSON body limits and error mapping.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error)
}

/// Path segment error mapping; non-integer ids become 400 rather than 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}

/// Query string error mapping.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}
