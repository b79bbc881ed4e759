//! Typed error handling for learnhub
//!
//! Every service operation fails with a [`HubError`]. The top-level enum groups
//! errors by category so the HTTP boundary can map them to a status code and a
//! stable error code without inspecting messages.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: missing, malformed or out-of-range input (400)
//! - [`AuthError`]: authentication (401) and authorization (403) failures
//! - [`EntityError`]: referenced entity absent (404) or duplicate email (400)
//! - [`StorageError`]: store failures, re-reported with the original message (500)
//!
//! # Example
//!
//! ```rust,ignore
//! match resources.get(id).await {
//!     Ok(view) => println!("{}", view.title),
//!     Err(HubError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("resource {} is gone", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for learnhub
#[derive(Debug, Error)]
pub enum HubError {
    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Authentication and authorization errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Entity lookup and uniqueness errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Unexpected runtime failures
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body sent to HTTP clients
///
/// Shares the `success`/`message` keys with the success envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl HubError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HubError::Validation(_) => StatusCode::BAD_REQUEST,
            HubError::Auth(e) => e.status_code(),
            HubError::Entity(e) => e.status_code(),
            HubError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HubError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            HubError::Validation(e) => e.error_code(),
            HubError::Auth(e) => e.error_code(),
            HubError::Entity(e) => e.error_code(),
            HubError::Storage(_) => "STORAGE_ERROR",
            HubError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            message: self.to_string(),
            code: self.error_code().to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            HubError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            HubError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }

    /// Shorthand for a resource that does not exist
    pub fn resource_not_found(id: Uuid) -> Self {
        HubError::Entity(EntityError::NotFound {
            entity_type: "Resource".to_string(),
            id,
        })
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("{}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Request body was not valid JSON for the expected shape
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Path identifier is not a UUID
    #[error("Invalid id format: '{value}'")]
    InvalidId { value: String },

    /// Rating missing, non-integer, or outside 1..=5
    #[error("Please provide a rating between 1 and 5")]
    InvalidRating,

    /// Category is not one of the enumerated values
    #[error("Invalid category '{value}'")]
    InvalidCategory { value: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    let msgs: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    format!("Validation failed: {}", msgs.join(", "))
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidId { .. } => "INVALID_ID",
            ValidationError::InvalidRating => "INVALID_RATING",
            ValidationError::InvalidCategory { .. } => "INVALID_CATEGORY",
        }
    }

    /// Field names that failed, in report order
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to authentication and authorization
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on a request that needs one
    #[error("Not authorized, no token provided")]
    MissingToken,

    /// Token failed signature or expiry verification
    #[error("Not authorized, token failed")]
    InvalidToken,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token is valid but its user no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Authenticated but not allowed
    #[error("{message}")]
    Forbidden { message: String },
}

impl AuthError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        AuthError::Forbidden {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "UNAUTHENTICATED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Forbidden { .. } => "FORBIDDEN",
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity lookups
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity was not found
    #[error("{entity_type} not found")]
    NotFound { entity_type: String, id: Uuid },

    /// Email already registered
    #[error("User already exists with this email")]
    DuplicateEmail { email: String },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            // Surfaced as 400 to match the client's existing convention
            EntityError::DuplicateEmail { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "NOT_FOUND",
            EntityError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend could not be reached or initialised
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// A store operation failed
    #[error("Storage error: {message}")]
    OperationFailed { message: String },
}

/// Store traits return `anyhow::Result`; anything escaping a store is
/// re-reported as a storage failure with the original message kept.
impl From<anyhow::Error> for HubError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StorageError>() {
            Ok(storage) => HubError::Storage(storage),
            Err(other) => HubError::Storage(StorageError::OperationFailed {
                message: format!("{:#}", other),
            }),
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        HubError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for learnhub operations
pub type HubResult<T> = Result<T, HubError>;
