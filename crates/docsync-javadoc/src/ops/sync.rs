//! Fixes between a method and its parent: copying docs and back-references.

use tracing::debug;

use docsync_core::model::{DeclId, MethodDecl};
use docsync_core::patch::{DocEdit, EditPlan};
use docsync_core::text::normalize_line_endings;

use super::{FixContext, FixError};
use crate::inspect::FixKind;
use crate::reference::{reference_tag, references_method};

/// Indentation used when the doc's closing line carries content.
const FALLBACK_INDENT: &str = "\n ";

// ============================================================================
// Doc Text
// ============================================================================

/// A doc holding only the reference tag.
///
/// Single-line: `/** @see X#m() */`. Multi-line: `/**\n * @see X#m()\n */`.
pub fn reference_doc(tag: &str, single_line: bool) -> String {
    if single_line {
        format!("/** {} */", tag)
    } else {
        format!("/**\n * {}\n */", tag)
    }
}

/// Append a tag line to an existing doc, keeping its content.
///
/// The tag line takes the indentation of the doc's closing line. When that
/// line also carries content (`   * @return x */`), a fixed indent is used
/// and the content stays on its own line. Multi-line formatting separates
/// the tag from the body with a blank ` *` line.
///
/// A doc without a line break is first rewritten into multi-line form. A doc
/// without a closing `*/` is closed after the tag.
pub fn append_reference(doc: &str, tag: &str, single_line: bool) -> String {
    let text = normalize_line_endings(doc);
    let text = text.trim_end();

    let Some(close) = text.rfind("*/") else {
        let head = text.trim_end_matches([' ', '\t']);
        let separator = if head.ends_with('\n') { "" } else { "\n" };
        return format!("{}{} * {}\n */", head, separator, tag);
    };

    let head = &text[..close];
    let (head, indent) = match head.rfind('\n') {
        None => {
            let body = head.trim().trim_start_matches("/**").trim();
            if body.is_empty() {
                return reference_doc(tag, single_line);
            }
            (format!("/**\n * {}\n ", body), FALLBACK_INDENT.to_string())
        }
        Some(idx) => {
            let indent = &head[idx..];
            if indent.trim().is_empty() {
                (head.to_string(), indent.to_string())
            } else {
                let mut head = head.trim_end_matches([' ', '\t']).to_string();
                head.push_str(FALLBACK_INDENT);
                (head, FALLBACK_INDENT.to_string())
            }
        }
    };

    let mut out = head;
    out.push('*');
    if single_line {
        out.push(' ');
    } else {
        out.push_str(&indent);
        out.push_str("* ");
    }
    out.push_str(tag);
    out.push_str(&indent);
    out.push_str("*/");
    out
}

// ============================================================================
// Fixes
// ============================================================================

/// Replace the method's doc with the parent's.
pub fn copy_from_parent(method: &MethodDecl, parent: &MethodDecl) -> Result<EditPlan, FixError> {
    let parent_doc = parent.doc.as_deref().ok_or_else(|| {
        FixError::precondition(
            FixKind::CopyFromParent,
            method.method_id,
            "parent method has no doc",
        )
    })?;
    Ok(EditPlan::single(DocEdit::replace(
        DeclId::Method(method.method_id),
        method.doc.as_deref(),
        parent_doc,
    )))
}

/// Replace (or create) the parent's doc with the method's.
pub fn replace_parent_doc(method: &MethodDecl, parent: &MethodDecl) -> Result<EditPlan, FixError> {
    let doc = method.doc.as_deref().ok_or_else(|| {
        FixError::precondition(FixKind::ReplaceParentDoc, method.method_id, "method has no doc")
    })?;
    Ok(EditPlan::single(DocEdit::replace(
        DeclId::Method(parent.method_id),
        parent.doc.as_deref(),
        doc,
    )))
}

/// Append a back-reference to the method's doc.
///
/// The plan is empty when the doc already references the parent. An
/// undocumented method gets a reference-only doc.
pub fn add_reference(ctx: &FixContext<'_>, method: &MethodDecl, parent: &MethodDecl) -> EditPlan {
    let tag = reference_tag(ctx.model, method, parent);
    let single_line = ctx.config.single_line_references;
    let target = DeclId::Method(method.method_id);

    let new_text = match method.doc.as_deref() {
        Some(doc) if references_method(ctx.model, doc, parent) => {
            debug!(decl = %target, "reference already present");
            return EditPlan::atomic();
        }
        Some(doc) => append_reference(doc, &tag, single_line),
        None => reference_doc(&tag, single_line),
    };
    EditPlan::single(DocEdit::replace(target, method.doc.as_deref(), new_text))
}

/// Replace the method's doc with a reference-only doc.
pub fn introduce_reference(
    ctx: &FixContext<'_>,
    method: &MethodDecl,
    parent: &MethodDecl,
) -> EditPlan {
    let tag = reference_tag(ctx.model, method, parent);
    let new_text = reference_doc(&tag, ctx.config.single_line_references);
    EditPlan::single(DocEdit::replace(
        DeclId::Method(method.method_id),
        method.doc.as_deref(),
        new_text,
    ))
}

/// Move the method's doc onto the parent and leave a reference behind.
///
/// Both edits land in one atomic plan: if either declaration cannot be
/// written, neither is.
pub fn move_to_parent_and_introduce_reference(
    ctx: &FixContext<'_>,
    method: &MethodDecl,
    parent: &MethodDecl,
) -> Result<EditPlan, FixError> {
    let doc = method.doc.as_deref().ok_or_else(|| {
        FixError::precondition(
            FixKind::MoveToParentAndIntroduceReference,
            method.method_id,
            "method has no doc",
        )
    })?;

    let mut plan = EditPlan::atomic();
    plan.push(DocEdit::replace(
        DeclId::Method(parent.method_id),
        parent.doc.as_deref(),
        doc,
    ));
    plan.edits.extend(introduce_reference(ctx, method, parent).edits);
    Ok(plan)
}
