//! Bridges from engine errors into [`DocSyncError`].
//!
//! ## Mapping
//!
//! - `LookupError::InvalidPath` -> `InvalidArguments` (exit code 2)
//! - `LookupError::NotFound` -> `DeclarationNotFound` (exit code 3)
//! - `LookupError::Ambiguous` -> `AmbiguousDeclaration` (exit code 3)
//! - `FixError::UnknownDeclaration` -> `DeclarationNotFound` (exit code 3)
//! - other `FixError` variants -> `InvalidArguments` (exit code 2)
//! - `TemplateError::Unavailable` -> `InvalidArguments` (exit code 2)
//! - `TemplateError::Io` -> `FileNotFound` for missing paths, else `InternalError`

use docsync_core::error::DocSyncError;

use crate::lookup::LookupError;
use crate::ops::FixError;
use crate::templates::TemplateError;

// ============================================================================
// Bridge: LookupError -> DocSyncError
// ============================================================================

impl From<LookupError> for DocSyncError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidPath { .. } => DocSyncError::invalid_args(err.to_string()),
            LookupError::NotFound { path } => DocSyncError::DeclarationNotFound { path },
            LookupError::Ambiguous { path, candidates } => {
                DocSyncError::AmbiguousDeclaration { path, candidates }
            }
        }
    }
}

// ============================================================================
// Bridge: FixError -> DocSyncError
// ============================================================================

impl From<FixError> for DocSyncError {
    fn from(err: FixError) -> Self {
        match &err {
            FixError::UnknownDeclaration { decl } => DocSyncError::decl_not_found(decl.to_string()),
            FixError::PreconditionFailed { fix, .. }
            | FixError::MissingParent { fix, .. }
            | FixError::NotApplicable { fix, .. } => DocSyncError::invalid_args_with_details(
                err.to_string(),
                serde_json::json!({ "fix": fix.id() }),
            ),
            FixError::TemplateUnavailable { category } => DocSyncError::invalid_args_with_details(
                err.to_string(),
                serde_json::json!({ "template": category.file_stem() }),
            ),
        }
    }
}

// ============================================================================
// Bridge: TemplateError -> DocSyncError
// ============================================================================

impl From<TemplateError> for DocSyncError {
    fn from(err: TemplateError) -> Self {
        match &err {
            TemplateError::Unavailable { .. } => DocSyncError::invalid_args(err.to_string()),
            TemplateError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                DocSyncError::file_not_found(path.display().to_string())
            }
            TemplateError::Io { .. } => DocSyncError::internal(err.to_string()),
        }
    }
}
