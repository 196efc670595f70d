//! Error types and error code constants for docsync.
//!
//! This module provides a unified error type (`DocSyncError`) that bridges
//! domain-specific errors from different subsystems (model loading, write-back,
//! fix computation) into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (declaration not found, ambiguous, file not found)
//! - `4`: Apply errors (failed to write doc changes back)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! ## Design
//!
//! - **Unified type**: `DocSyncError` is the single error type for CLI output
//! - **Bridging**: `impl From<X> for DocSyncError` bridges domain errors
//! - **Code mapping**: `OutputErrorCode` provides stable integer codes for JSON

use std::fmt;

use thiserror::Error;

use crate::adapter::WriteBackError;
use crate::config::ConfigError;
use crate::model::ModelError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (declaration not found, ambiguous, file not found).
    ResolutionError = 3,
    /// Apply errors (write-back rejected, stale doc).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
///
/// All subsystem errors are converted to this type before being rendered as
/// JSON output.
#[derive(Debug, Error)]
pub enum DocSyncError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// No declaration matches the given path.
    #[error("declaration not found: {path}")]
    DeclarationNotFound { path: String },

    /// More than one declaration matches the given path.
    #[error("ambiguous declaration: {path}")]
    AmbiguousDeclaration {
        path: String,
        candidates: Vec<String>,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to apply doc changes.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        decl: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&DocSyncError> for OutputErrorCode {
    fn from(err: &DocSyncError) -> Self {
        match err {
            DocSyncError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            DocSyncError::DeclarationNotFound { .. } => OutputErrorCode::ResolutionError,
            DocSyncError::AmbiguousDeclaration { .. } => OutputErrorCode::ResolutionError,
            DocSyncError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            DocSyncError::ApplyError { .. } => OutputErrorCode::ApplyError,
            DocSyncError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<DocSyncError> for OutputErrorCode {
    fn from(err: DocSyncError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridge: ModelError -> DocSyncError
// ============================================================================

impl From<ModelError> for DocSyncError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::DuplicateType { name } => DocSyncError::InvalidArguments {
                message: format!("duplicate type in model: {}", name),
                details: None,
            },
            ModelError::UnknownType { name } => DocSyncError::DeclarationNotFound { path: name },
            ModelError::UnknownDeclaration { id } => DocSyncError::InternalError {
                message: format!("unknown declaration id: {}", id),
            },
        }
    }
}

// ============================================================================
// Bridge: WriteBackError -> DocSyncError
// ============================================================================

impl From<WriteBackError> for DocSyncError {
    fn from(err: WriteBackError) -> Self {
        DocSyncError::ApplyError {
            message: err.to_string(),
            decl: Some(err.decl().to_string()),
        }
    }
}

// ============================================================================
// Bridge: ConfigError -> DocSyncError
// ============================================================================

impl From<ConfigError> for DocSyncError {
    fn from(err: ConfigError) -> Self {
        match &err {
            ConfigError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                DocSyncError::FileNotFound {
                    path: path.display().to_string(),
                }
            }
            _ => DocSyncError::InvalidArguments {
                message: err.to_string(),
                details: None,
            },
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl DocSyncError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        DocSyncError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        DocSyncError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a declaration not found error.
    pub fn decl_not_found(path: impl Into<String>) -> Self {
        DocSyncError::DeclarationNotFound { path: path.into() }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        DocSyncError::FileNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        DocSyncError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclId, MethodId};

    mod error_code_mapping {
        use super::*;

        #[test]
        fn decl_not_found_maps_to_resolution_error() {
            let err = DocSyncError::decl_not_found("p1.Foo#bar()");
            assert_eq!(
                OutputErrorCode::from(&err),
                OutputErrorCode::ResolutionError
            );
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn invalid_arguments_maps_to_invalid_arguments() {
            let err = DocSyncError::invalid_args("unknown fix id");
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn ambiguous_maps_to_resolution_error() {
            let err = DocSyncError::AmbiguousDeclaration {
                path: "p1.Foo#bar".to_string(),
                candidates: vec!["p1.Foo#bar()".into(), "p1.Foo#bar(int)".into()],
            };
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        }

        #[test]
        fn apply_error_maps_to_apply_error() {
            let err = DocSyncError::ApplyError {
                message: "stale doc".to_string(),
                decl: None,
            };
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn internal_error_maps_to_internal_error() {
            let err = DocSyncError::internal("unexpected state");
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod bridges {
        use super::*;

        #[test]
        fn duplicate_type_is_invalid_input() {
            let err: DocSyncError = ModelError::DuplicateType {
                name: "p1.Foo".to_string(),
            }
            .into();
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
            assert!(err.to_string().contains("p1.Foo"));
        }

        #[test]
        fn write_back_error_keeps_declaration() {
            let err: DocSyncError = WriteBackError::ReadOnly {
                decl: DeclId::Method(MethodId::new(4)),
            }
            .into();
            match err {
                DocSyncError::ApplyError { decl, .. } => {
                    assert_eq!(decl.as_deref(), Some("method_4"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    mod output_error_code {
        use super::*;

        #[test]
        fn code_values_are_stable() {
            assert_eq!(OutputErrorCode::InvalidArguments.code(), 2);
            assert_eq!(OutputErrorCode::ResolutionError.code(), 3);
            assert_eq!(OutputErrorCode::ApplyError.code(), 4);
            assert_eq!(OutputErrorCode::InternalError.code(), 10);
        }

        #[test]
        fn display_shows_code() {
            assert_eq!(format!("{}", OutputErrorCode::ResolutionError), "3");
            assert_eq!(format!("{}", OutputErrorCode::InternalError), "10");
        }
    }
}
