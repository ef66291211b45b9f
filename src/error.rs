//! ==============================================================================
//! error.rs - storage faults and their http mapping
//! ==============================================================================
//!
//! two layers:
//!     - StorageError: what storage.rs returns. `is_operational` tells the
//!       ingest path whether the engine itself is unhappy (missing table,
//!       locked file, corruption) so it can re-create the schema.
//!     - ApiError: what handlers return. renders as `{"error": "..."}` with
//!       400 for validation problems and 500 for everything else.
//!
//! note: Unexpected carries raw error text back to the caller. sensors rely
//! on that message for debugging, but it does leak internals.
//!
//! ==============================================================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{}", sqlite_detail(.0))]
    Sqlite(#[from] rusqlite::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StorageError {
    /// true for faults of the database engine itself rather than of the data
    /// being written: missing schema, busy/locked file, corruption, disk trouble.
    pub fn is_operational(&self) -> bool {
        match self {
            StorageError::Sqlite(e) => matches!(
                e.sqlite_error_code(),
                Some(ErrorCode::Unknown
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::NotADatabase
                    | ErrorCode::CannotOpen
                    | ErrorCode::ReadOnly
                    | ErrorCode::DiskFull
                    | ErrorCode::PermissionDenied
                    | ErrorCode::FileLockingProtocolFailed
                    | ErrorCode::SchemaChanged
                    | ErrorCode::OperationInterrupted)
            ),
            StorageError::Io(_) => true,
            _ => false,
        }
    }
}

/// engine message without the echoed sql, e.g. "no such table: light_readings"
fn sqlite_detail(e: &rusqlite::Error) -> String {
    match e {
        rusqlite::Error::SqlInputError { msg, .. } => msg.clone(),
        other => other.to_string(),
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// request is missing or mistypes a required field
    #[error("{0}")]
    Validation(String),
    /// engine fault; the schema has already been re-ensured when this is built
    #[error("Database error, reinitializing: {0}")]
    StorageOperational(String),
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::StorageOperational(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Unexpected(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
