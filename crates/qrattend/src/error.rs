//! Error types for qrattend.
//!
//! This module defines the error types used throughout the qrattend crate.
//! [`Error`] covers everything that aborts an operation; [`DecodeError`] covers
//! per-image failures that a scan logs and skips.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for qrattend operations.
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

    // === Registry Errors ===
    /// A student with this roll number is already registered.
    #[error("roll number already exists: {roll_number}")]
    DuplicateRollNumber {
        /// The conflicting roll number.
        roll_number: String,
    },

    /// No student is registered under this roll number.
    #[error("no student with roll number {roll_number}")]
    StudentNotFound {
        /// The roll number that was looked up.
        roll_number: String,
    },

    /// Roll number or name rejected before touching storage.
    #[error("invalid student: {message}")]
    InvalidStudent {
        /// Why the input was rejected.
        message: String,
    },

    // === Scan Errors ===
    /// The directory given to a scan does not exist.
    #[error("input directory not found: {path}")]
    InputDirectoryMissing {
        /// The directory that was requested.
        path: PathBuf,
    },

    // === QR Errors ===
    /// The payload could not be encoded as a QR code.
    #[error("failed to encode QR code for {roll_number}: {source}")]
    QrEncode {
        /// Roll number of the student being encoded.
        roll_number: String,
        /// The underlying error.
        #[source]
        source: qrcode::types::QrError,
    },

    /// Failed to write a generated QR image.
    #[error("failed to write image {path}: {source}")]
    ImageWrite {
        /// Destination path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: image::ImageError,
    },

    // === Report Errors ===
    /// CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

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
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for qrattend operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate roll number error.
    #[must_use]
    pub fn duplicate_roll_number(roll_number: impl Into<String>) -> Self {
        Self::DuplicateRollNumber {
            roll_number: roll_number.into(),
        }
    }

    /// Create a student not found error.
    #[must_use]
    pub fn student_not_found(roll_number: impl Into<String>) -> Self {
        Self::StudentNotFound {
            roll_number: roll_number.into(),
        }
    }

    /// Create an invalid student error.
    #[must_use]
    pub fn invalid_student(message: impl Into<String>) -> Self {
        Self::InvalidStudent {
            message: message.into(),
        }
    }

    /// Check if this error is a duplicate roll number.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateRollNumber { .. })
    }

    /// Check if this error is an unknown roll number.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound { .. })
    }

    /// Check if this error comes from the database layer.
    ///
    /// Storage failures are fatal for the whole process.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseMigration { .. }
        )
    }
}

/// Failure to turn one image into a usable payload.
///
/// These never abort a scan; the offending file is logged and skipped.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The image file could not be opened or decoded.
    #[error("failed to read image {path}: {source}")]
    Image {
        /// Path to the image.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: image::ImageError,
    },

    /// A QR grid was located but its content could not be read.
    #[error("unreadable QR code in {path}: {message}")]
    Unreadable {
        /// Path to the image.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// Payload text lacks the `|` delimiter.
    #[error("malformed payload {payload:?}: missing '|' delimiter")]
    MissingDelimiter {
        /// The decoded text.
        payload: String,
    },

    /// Payload text has nothing before the delimiter.
    #[error("malformed payload {payload:?}: empty roll number")]
    EmptyRollNumber {
        /// The decoded text.
        payload: String,
    },
}
