use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Missing or malformed required field
    #[error("{0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Entity is not in the status the operation requires, or a companion already exists
    #[error("{0}")]
    StateConflict(String),

    /// Duplicate business key (lpo_no, invoice_no)
    #[error("{0}")]
    Uniqueness(String),

    /// Insufficient stock or payment exceeding the remaining balance
    #[error("{0}")]
    Capacity(String),

    /// Delete blocked by existing dependents
    #[error("{0}")]
    Dependency(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration errors at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Unexpected failures never leak storage details to the caller
        let message = if status_code.is_server_error() {
            tracing::error!(error = %self, "Request failed with unexpected error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status_code).json(serde_json::json!({ "error": message }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::StateConflict(_)
            | AppError::Uniqueness(_)
            | AppError::Capacity(_)
            | AppError::Dependency(_)
            | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn state_conflict(msg: impl Into<String>) -> Self {
        AppError::StateConflict(msg.into())
    }

    pub fn uniqueness(msg: impl Into<String>) -> Self {
        AppError::Uniqueness(msg.into())
    }

    pub fn capacity(msg: impl Into<String>) -> Self {
        AppError::Capacity(msg.into())
    }

    pub fn dependency(msg: impl Into<String>) -> Self {
        AppError::Dependency(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Map a storage error, turning unique-key violations into `Uniqueness`
    pub fn from_write(err: sqlx::Error, duplicate_message: impl Into<String>) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Uniqueness(duplicate_message.into());
            }
        }
        AppError::Database(err)
    }
}
