//! Fix computation.
//!
//! Every fix computes an [`EditPlan`] holding the complete new doc text of
//! each declaration it touches. Nothing is written here: the caller applies
//! the plan through a [`DocWriteBack`](docsync_core::adapter::DocWriteBack)
//! once the model is no longer borrowed for analysis.
//!
//! - [`sync`]: fixes that copy docs or add back-references between a method
//!   and its parent
//! - [`generate`]: template-based generation

pub mod generate;
pub mod sync;

use thiserror::Error;
use tracing::{debug, warn};

use docsync_core::config::AnalysisConfig;
use docsync_core::model::{DeclId, FieldDecl, MethodDecl, MethodId, ProgramModel, TypeDecl};
use docsync_core::patch::EditPlan;

use crate::inspect::{Analyzer, FixKind, FixRequest};
use crate::templates::{DocGenerator, MergeContext, TemplateCategory, TemplateError, TemplateSource};

// ============================================================================
// Errors
// ============================================================================

/// Errors computing a fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    /// The declaration is not in the state the fix expects.
    #[error("cannot apply {fix} to {decl}: {reason}")]
    PreconditionFailed {
        fix: FixKind,
        decl: DeclId,
        reason: String,
    },

    /// The fix works against a parent method and none was given.
    #[error("{fix} on {decl} needs a parent method")]
    MissingParent { fix: FixKind, decl: DeclId },

    /// No template is available for the category the fix needs.
    #[error("no template available for category '{category}'")]
    TemplateUnavailable { category: TemplateCategory },

    /// The fix is not offered for this declaration.
    #[error("{fix} is not applicable to {decl}")]
    NotApplicable { fix: FixKind, decl: DeclId },

    #[error("unknown declaration: {decl}")]
    UnknownDeclaration { decl: DeclId },
}

impl FixError {
    fn precondition(fix: FixKind, decl: impl Into<DeclId>, reason: impl Into<String>) -> Self {
        FixError::PreconditionFailed {
            fix,
            decl: decl.into(),
            reason: reason.into(),
        }
    }

    /// Map a template load failure. `requested` is used when the error does
    /// not name its own category.
    pub(crate) fn from_template(requested: TemplateCategory, err: TemplateError) -> Self {
        match &err {
            TemplateError::Unavailable { category } => FixError::TemplateUnavailable {
                category: *category,
            },
            TemplateError::Io { .. } => {
                warn!(category = %requested, error = %err, "template could not be read");
                FixError::TemplateUnavailable {
                    category: requested,
                }
            }
        }
    }
}

// ============================================================================
// Context
// ============================================================================

/// Everything a fix reads.
#[derive(Clone)]
pub struct FixContext<'a> {
    pub model: &'a ProgramModel,
    pub config: &'a AnalysisConfig,
    pub templates: &'a dyn TemplateSource,
    /// `${USER}` and `${DATE}` for generated docs.
    pub merge: MergeContext,
}

impl<'a> FixContext<'a> {
    /// Create a context merging templates with the current user and date.
    pub fn new(
        model: &'a ProgramModel,
        config: &'a AnalysisConfig,
        templates: &'a dyn TemplateSource,
    ) -> Self {
        FixContext {
            model,
            config,
            templates,
            merge: MergeContext::now(),
        }
    }

    /// Use a fixed user and date.
    pub fn with_merge_context(mut self, merge: MergeContext) -> Self {
        self.merge = merge;
        self
    }

    pub fn analyzer(&self) -> Analyzer<'a> {
        Analyzer::new(self.model, self.config, self.templates)
    }

    pub fn generator(&self) -> DocGenerator<'a> {
        DocGenerator::new(self.model, self.templates, self.merge.clone())
    }

    fn method(&self, id: MethodId) -> Result<&'a MethodDecl, FixError> {
        self.model
            .method(id)
            .ok_or(FixError::UnknownDeclaration {
                decl: DeclId::Method(id),
            })
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Compute the edits of one fix.
///
/// # Errors
///
/// - [`FixError::UnknownDeclaration`] if the target or parent is not in the model
/// - [`FixError::MissingParent`] if a parent fix carries no parent
/// - [`FixError::NotApplicable`] if the fix does not address the target's kind
/// - [`FixError::PreconditionFailed`] if the target's doc state rules the fix out
/// - [`FixError::TemplateUnavailable`] if generation has no template
pub fn compute_fix(ctx: &FixContext<'_>, request: &FixRequest) -> Result<EditPlan, FixError> {
    let decl = request.target;
    if !ctx.model.contains(decl) {
        return Err(FixError::UnknownDeclaration { decl });
    }
    debug!(fix = %request.kind, %decl, "computing fix");

    if request.kind.needs_parent() {
        let method = target_method(ctx, request)?;
        let parent_id = request.parent.ok_or(FixError::MissingParent {
            fix: request.kind,
            decl,
        })?;
        let parent = ctx.method(parent_id)?;
        return match request.kind {
            FixKind::CopyFromParent => sync::copy_from_parent(method, parent),
            FixKind::ReplaceParentDoc => sync::replace_parent_doc(method, parent),
            FixKind::AddReference => Ok(sync::add_reference(ctx, method, parent)),
            FixKind::IntroduceReference => Ok(sync::introduce_reference(ctx, method, parent)),
            FixKind::MoveToParentAndIntroduceReference => {
                sync::move_to_parent_and_introduce_reference(ctx, method, parent)
            }
            _ => Err(FixError::NotApplicable {
                fix: request.kind,
                decl,
            }),
        };
    }

    match request.kind {
        FixKind::GenerateFromSignature => generate::from_signature(ctx, target_method(ctx, request)?),
        FixKind::GenerateFromClass => generate::from_class(ctx, target_type(ctx, request)?),
        FixKind::GenerateFromField => generate::from_field(ctx, target_field(ctx, request)?),
        FixKind::GenerateForAllMethods => {
            generate::for_all_methods(ctx, target_type(ctx, request)?)
        }
        _ => Err(FixError::NotApplicable {
            fix: request.kind,
            decl,
        }),
    }
}

/// Find the fix of `kind` that the analyzer offers for `decl`.
///
/// This is how callers that address fixes by id obtain the parent method a
/// sync fix works against.
pub fn offered_fix(
    analyzer: &Analyzer<'_>,
    decl: DeclId,
    kind: FixKind,
) -> Result<FixRequest, FixError> {
    if !analyzer.model().contains(decl) {
        return Err(FixError::UnknownDeclaration { decl });
    }
    analyzer
        .check(decl)
        .iter()
        .find_map(|d| d.fix(kind).copied())
        .ok_or(FixError::NotApplicable { fix: kind, decl })
}

fn target_method<'a>(
    ctx: &FixContext<'a>,
    request: &FixRequest,
) -> Result<&'a MethodDecl, FixError> {
    match request.target {
        DeclId::Method(id) => ctx.method(id),
        decl => Err(FixError::NotApplicable {
            fix: request.kind,
            decl,
        }),
    }
}

fn target_type<'a>(ctx: &FixContext<'a>, request: &FixRequest) -> Result<&'a TypeDecl, FixError> {
    match request.target {
        DeclId::Type(id) => ctx
            .model
            .type_decl(id)
            .ok_or(FixError::UnknownDeclaration {
                decl: request.target,
            }),
        decl => Err(FixError::NotApplicable {
            fix: request.kind,
            decl,
        }),
    }
}

fn target_field<'a>(
    ctx: &FixContext<'a>,
    request: &FixRequest,
) -> Result<&'a FieldDecl, FixError> {
    match request.target {
        DeclId::Field(id) => ctx.model.field(id).ok_or(FixError::UnknownDeclaration {
            decl: request.target,
        }),
        decl => Err(FixError::NotApplicable {
            fix: request.kind,
            decl,
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
