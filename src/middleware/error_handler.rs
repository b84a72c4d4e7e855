use actix_web::{error, web, HttpRequest};

use crate::core::AppError;

/// Largest JSON body accepted
const JSON_LIMIT_BYTES: usize = 256 * 1024;

/// JSON extractor settings: malformed bodies answer `400 {"error": ...}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(json_error_handler)
}

/// Query extractor settings: bad `?start=`, `?status=` and the like answer `400 {"error": ...}`
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = req.path(), error = %err, "Rejected request body");
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = req.path(), error = %err, "Rejected query string");
    AppError::validation(format!("Invalid query parameters: {}", err)).into()
}
