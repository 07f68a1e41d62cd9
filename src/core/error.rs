//! Typed error handling for carepanel
//!
//! Every failure mode of the collection core is local and recoverable, so
//! each one is a variant of a small typed enum rather than an opaque error.
//!
//! # Error Categories
//!
//! - [`TransitionError`]: a requested status is unknown or unreachable
//! - [`LookupError`]: a record addressed by id no longer exists
//! - [`StoreError`]: insertion violated the id-uniqueness invariant
//! - [`CollectionError`]: view-level operations (delete, persistence)
//! - [`ConfigError`]: workflow configuration could not be loaded
//! - [`ValidationError`]: malformed request input
//!
//! [`CareError`] aggregates all of them and maps each to an HTTP status.
//!
//! # Example
//!
//! ```rust,ignore
//! match view.on_status_change_requested("1", OrderStatus::Shipped) {
//!     Ok(Some(order)) => println!("now {}", order.status),
//!     Ok(None) => {} // stale id, nothing to do
//!     Err(TransitionError::Invalid { from, to }) => {
//!         eprintln!("cannot move {} -> {}", from, to);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for carepanel
#[derive(Debug, Error)]
pub enum CareError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CareError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CareError::Transition(e) => e.status_code(),
            CareError::Lookup(_) => StatusCode::NOT_FOUND,
            CareError::Store(_) => StatusCode::CONFLICT,
            CareError::Collection(e) => e.status_code(),
            CareError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CareError::Validation(_) => StatusCode::BAD_REQUEST,
            CareError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CareError::Transition(e) => e.error_code(),
            CareError::Lookup(_) => "RECORD_NOT_FOUND",
            CareError::Store(_) => "DUPLICATE_ID",
            CareError::Collection(e) => e.error_code(),
            CareError::Config(_) => "CONFIG_ERROR",
            CareError::Validation(_) => "VALIDATION_ERROR",
            CareError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CareError::Transition(TransitionError::Invalid { from, to, allowed }) => {
                Some(serde_json::json!({
                    "from": from,
                    "to": to,
                    "allowed": allowed,
                }))
            }
            CareError::Lookup(LookupError::NotFound { resource, id }) => Some(serde_json::json!({
                "resource": resource,
                "id": id,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for CareError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Transition Errors
// =============================================================================

/// Errors raised by the status transition applier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The requested status is not reachable in one step from the current one
    #[error("Cannot transition from '{from}' to '{to}'")]
    Invalid {
        from: String,
        to: String,
        allowed: Vec<String>,
    },

    /// The requested status is not a member of the domain's enum
    #[error("Unknown status '{value}' for {resource}")]
    UnknownStatus { resource: String, value: String },
}

impl TransitionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TransitionError::Invalid { .. } => StatusCode::CONFLICT,
            TransitionError::UnknownStatus { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TransitionError::Invalid { .. } => "INVALID_TRANSITION",
            TransitionError::UnknownStatus { .. } => "UNKNOWN_STATUS",
        }
    }
}

// =============================================================================
// Lookup Errors
// =============================================================================

/// A record addressed by id does not exist in its collection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised when seeding or inserting into a collection store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{resource} with id '{id}' already exists")]
    DuplicateId { resource: String, id: String },
}

// =============================================================================
// Collection Errors
// =============================================================================

/// Errors raised by collection-level operations
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Only some domains allow records to be removed
    #[error("Records of type {resource} cannot be deleted")]
    DeleteNotSupported { resource: String },

    /// The injected persister refused or failed to store the record
    #[error("Failed to persist {resource} '{id}': {message}")]
    Persistence {
        resource: String,
        id: String,
        message: String,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl CollectionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CollectionError::DeleteNotSupported { .. } => StatusCode::METHOD_NOT_ALLOWED,
            CollectionError::Persistence { .. } => StatusCode::BAD_GATEWAY,
            CollectionError::Transition(e) => e.status_code(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CollectionError::DeleteNotSupported { .. } => "DELETE_NOT_SUPPORTED",
            CollectionError::Persistence { .. } => "PERSISTENCE_FAILED",
            CollectionError::Transition(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to workflow configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A transition table names a status the domain does not have
    #[error("Unknown status '{status}' in transitions for {resource}")]
    UnknownStatus { resource: String, status: String },

    /// A transition table reopens a status the domain declares terminal
    #[error("Status '{status}' of {resource} is terminal and cannot have transitions")]
    TerminalStatus { resource: String, status: String },

    /// A collection entry names a resource no domain registered
    #[error("Configured collection '{resource}' is not registered")]
    UnknownCollection { resource: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid query parameter '{param}': {message}")]
    InvalidQuery { param: String, message: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

impl From<serde_json::Error> for CareError {
    fn from(err: serde_json::Error) -> Self {
        CareError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<JsonRejection> for CareError {
    fn from(rejection: JsonRejection) -> Self {
        CareError::Validation(ValidationError::InvalidJson {
            message: rejection.body_text(),
        })
    }
}

impl From<anyhow::Error> for CareError {
    fn from(err: anyhow::Error) -> Self {
        CareError::Internal(err.to_string())
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for carepanel operations
pub type CareResult<T> = Result<T, CareError>;
