//! JSON output types and serialization for CLI responses.
//!
//! These types form the contract of the `docsync` command line.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input produces the same output (field order, array ordering)
//! 3. **Paths, not IDs:** Declarations are addressed by their textual path
//!    (`pkg.Type#method(T)`) since arena IDs are not stable across runs
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{DocSyncError, OutputErrorCode};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Diagnostics
// ============================================================================

/// A fix offered for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixInfo {
    /// Stable fix id (`add-reference`, `copy-from-parent`, ...).
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

/// One diagnostic for one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    /// Path of the declaration.
    pub decl: String,
    /// Stable diagnostic code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Offered fixes, in preference order.
    pub fixes: Vec<FixInfo>,
}

/// Counts for a check run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub types: usize,
    pub methods: usize,
    pub fields: usize,
    pub diagnostics: usize,
}

/// Response for `docsync check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Status: "ok".
    pub status: String,
    pub schema_version: String,
    pub diagnostics: Vec<DiagnosticInfo>,
    pub summary: CheckSummary,
}

impl CheckResponse {
    pub fn new(diagnostics: Vec<DiagnosticInfo>, mut summary: CheckSummary) -> Self {
        summary.diagnostics = diagnostics.len();
        CheckResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            diagnostics,
            summary,
        }
    }
}

// ============================================================================
// Fixes
// ============================================================================

/// A planned doc edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditInfo {
    /// Path of the edited declaration.
    pub decl: String,
    /// `replace` or `insert_before`.
    pub mode: String,
    pub new_text: String,
}

/// A member that could not be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    pub decl: String,
    pub reason: String,
}

/// Response for `docsync fix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResponse {
    /// Status: "ok", or "partial" when some members failed.
    pub status: String,
    pub schema_version: String,
    /// Fix id that was computed.
    pub fix: String,
    /// Path of the declaration the fix was invoked on.
    pub decl: String,
    pub edits: Vec<EditInfo>,
    /// Whether the edits were written back.
    pub applied: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureInfo>,
}

impl FixResponse {
    pub fn new(
        fix: impl Into<String>,
        decl: impl Into<String>,
        edits: Vec<EditInfo>,
        applied: bool,
        failures: Vec<FailureInfo>,
    ) -> Self {
        let status = if failures.is_empty() { "ok" } else { "partial" };
        FixResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            fix: fix.into(),
            decl: decl.into(),
            edits,
            applied,
            failures,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error details in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code (also the process exit code).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a DocSyncError.
    pub fn from_error(err: &DocSyncError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let details = match err {
            DocSyncError::InvalidArguments { details, .. } => details.clone(),
            DocSyncError::AmbiguousDeclaration { candidates, .. } => {
                Some(serde_json::json!({ "candidates": candidates }))
            }
            DocSyncError::ApplyError {
                decl: Some(decl), ..
            } => Some(serde_json::json!({ "decl": decl })),
            _ => None,
        };
        ErrorInfo {
            code,
            message: err.to_string(),
            details,
        }
    }
}

/// Response emitted when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a DocSyncError.
    pub fn from_error(err: &DocSyncError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
