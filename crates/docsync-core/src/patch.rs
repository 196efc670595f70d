//! Doc edit IR: DocEdit and EditPlan for doc write-back transactions.
//!
//! This module implements the edit infrastructure for docsync:
//! - Doc edits with content-hash preconditions
//! - Atomic apply (all-or-nothing) for multi-declaration fixes
//! - Independent apply (partial success) for batch fixes
//!
//! Every fix computes the complete new doc text of every declaration it
//! touches before anything is written. An [`EditPlan`] is that result.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, warn};

use crate::adapter::{DocWriteBack, WriteBackError};
use crate::model::DeclId;

/// Hash type for content verification (SHA-256, stored as hex string for JSON compatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA-256 hash of the given bytes, returning hex-encoded string.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }

    /// Hash of a doc slot; `None` for an empty slot.
    pub fn of_doc(doc: Option<&str>) -> Option<Self> {
        doc.map(|text| ContentHash::compute(text.as_bytes()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Edits
// ============================================================================

/// How the new text lands in the declaration's doc slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Replace the existing doc, or create one if absent.
    Replace,
    /// Insert a new doc immediately before the declaration.
    InsertBefore,
}

/// One doc write for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEdit {
    pub target: DeclId,
    pub mode: EditMode,
    pub new_text: String,
    /// Hash of the doc this edit was computed against; `None` if there was none.
    pub expected_before: Option<ContentHash>,
}

impl DocEdit {
    /// Replace the doc of `target`, which currently reads `before`.
    pub fn replace(target: DeclId, before: Option<&str>, new_text: impl Into<String>) -> Self {
        DocEdit {
            target,
            mode: EditMode::Replace,
            new_text: new_text.into(),
            expected_before: ContentHash::of_doc(before),
        }
    }

    /// Insert a doc before an undocumented `target`.
    pub fn insert_before(target: DeclId, new_text: impl Into<String>) -> Self {
        DocEdit {
            target,
            mode: EditMode::InsertBefore,
            new_text: new_text.into(),
            expected_before: None,
        }
    }

    /// Check the edit's precondition against the current doc.
    pub fn verify(&self, current: Option<&str>) -> Result<(), WriteBackError> {
        let actual = ContentHash::of_doc(current);
        if actual == self.expected_before {
            return Ok(());
        }
        Err(WriteBackError::StaleDoc {
            decl: self.target,
            expected: describe_hash(self.expected_before.as_ref()),
            actual: describe_hash(actual.as_ref()),
        })
    }
}

fn describe_hash(hash: Option<&ContentHash>) -> String {
    match hash {
        Some(h) => h.to_string(),
        None => "no doc".to_string(),
    }
}

// ============================================================================
// Plans
// ============================================================================

/// How the edits of a plan relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Every precondition is checked before the first write; any failure writes nothing.
    Atomic,
    /// Each edit is applied on its own; failures are collected.
    Independent,
}

/// A declaration that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFailure {
    pub decl: DeclId,
    pub reason: String,
}

impl MemberFailure {
    pub fn new(decl: DeclId, reason: impl Into<String>) -> Self {
        MemberFailure {
            decl,
            reason: reason.into(),
        }
    }
}

/// The complete set of doc edits computed by a fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    pub mode: ApplyMode,
    /// Edits in application order.
    pub edits: Vec<DocEdit>,
    /// Members that failed while the plan was being computed.
    pub failures: Vec<MemberFailure>,
}

impl EditPlan {
    /// Create an empty atomic plan.
    pub fn atomic() -> Self {
        EditPlan {
            mode: ApplyMode::Atomic,
            edits: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Create an empty plan whose edits apply independently.
    pub fn independent() -> Self {
        EditPlan {
            mode: ApplyMode::Independent,
            edits: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Create an atomic plan holding one edit.
    pub fn single(edit: DocEdit) -> Self {
        let mut plan = EditPlan::atomic();
        plan.push(edit);
        plan
    }

    /// Append an edit.
    pub fn push(&mut self, edit: DocEdit) {
        self.edits.push(edit);
    }

    /// Record a member that could not be planned.
    pub fn record_failure(&mut self, failure: MemberFailure) {
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// New text planned for a declaration (last edit wins).
    pub fn new_text_for(&self, decl: DeclId) -> Option<&str> {
        self.edits
            .iter()
            .rev()
            .find(|e| e.target == decl)
            .map(|e| e.new_text.as_str())
    }

    /// Apply the plan through a write-back hook.
    pub fn apply(&self, sink: &mut dyn DocWriteBack) -> ApplyReport {
        let mut report = ApplyReport {
            applied: Vec::new(),
            failed: self.failures.clone(),
        };

        match self.mode {
            ApplyMode::Atomic => {
                let mut problems = Vec::new();
                for edit in &self.edits {
                    if let Err(err) = edit.verify(sink.current_doc(edit.target)) {
                        problems.push(MemberFailure::new(edit.target, err.to_string()));
                    } else if !sink.can_write(edit.target) {
                        let err = WriteBackError::ReadOnly { decl: edit.target };
                        problems.push(MemberFailure::new(edit.target, err.to_string()));
                    }
                }
                if !problems.is_empty() {
                    debug!(count = problems.len(), "atomic plan rejected, nothing written");
                    report.failed.extend(problems);
                    return report;
                }
                for edit in &self.edits {
                    match sink.set_doc(edit.target, edit.new_text.clone()) {
                        Ok(()) => report.applied.push(edit.target),
                        Err(err) => report
                            .failed
                            .push(MemberFailure::new(edit.target, err.to_string())),
                    }
                }
            }
            ApplyMode::Independent => {
                for edit in &self.edits {
                    let result = edit
                        .verify(sink.current_doc(edit.target))
                        .and_then(|()| sink.set_doc(edit.target, edit.new_text.clone()));
                    match result {
                        Ok(()) => report.applied.push(edit.target),
                        Err(err) => {
                            warn!(decl = %edit.target, error = %err, "doc write failed, continuing");
                            report
                                .failed
                                .push(MemberFailure::new(edit.target, err.to_string()));
                        }
                    }
                }
            }
        }

        report
    }
}

/// Outcome of applying an [`EditPlan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Declarations whose doc was written.
    pub applied: Vec<DeclId>,
    /// Declarations that failed, during planning or during write-back.
    pub failed: Vec<MemberFailure>,
}

impl ApplyReport {
    /// True if nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
