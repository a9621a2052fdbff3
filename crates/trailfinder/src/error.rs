//! Error types for trailfinder.
//!
//! This module defines all error types used throughout the trailfinder crate.
//! The filter engine and elevation projector are infallible; these errors come
//! from the persistence, configuration and input boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for trailfinder operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The background writer is gone and can no longer accept writes.
    #[error("persistence writer is closed")]
    PersisterClosed,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Catalog Errors ===
    /// A difficulty string did not name a known difficulty.
    #[error("unknown difficulty '{value}' (expected easy, moderate or hard)")]
    UnknownDifficulty {
        /// The rejected input.
        value: String,
    },

    /// No trail with the given id exists in the catalog.
    #[error("no trail with id '{id}'")]
    UnknownTrail {
        /// The id that was looked up.
        id: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for trailfinder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an unknown trail error.
    #[must_use]
    pub fn unknown_trail(id: impl Into<String>) -> Self {
        Self::UnknownTrail { id: id.into() }
    }

    /// Check if this error is a missing trail lookup.
    #[must_use]
    pub fn is_unknown_trail(&self) -> bool {
        matches!(self, Self::UnknownTrail { .. })
    }
}
