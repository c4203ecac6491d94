//! Core error types for the Braindiff service

use thiserror::Error;

use crate::outcome::Chained;

/// Core error type for all operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("State not found: {0}")]
    StateNotFound(String),

    #[error("District not found: {0}")]
    DistrictNotFound(String),

    #[error("School not found: {0}")]
    SchoolNotFound(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Invalid schema name: {0:?}")]
    InvalidSchemaName(String),

    #[error("{0}")]
    Context(#[from] Chained),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
