//! Template-based generation fixes.

use tracing::{debug, warn};

use docsync_core::model::{DeclId, FieldDecl, MethodDecl, TypeDecl};
use docsync_core::patch::{DocEdit, EditPlan, MemberFailure};

use super::{FixContext, FixError};
use crate::inspect::FixKind;
use crate::templates::{DocGenerator, TemplateCategory};

/// Generate a doc for an undocumented method from its signature.
pub fn from_signature(ctx: &FixContext<'_>, method: &MethodDecl) -> Result<EditPlan, FixError> {
    if method.doc.is_some() {
        return Err(FixError::precondition(
            FixKind::GenerateFromSignature,
            method.method_id,
            "method already has a doc",
        ));
    }
    let text = ctx
        .generator()
        .generate_method(method)
        .map_err(|err| FixError::from_template(DocGenerator::method_category(method), err))?;
    Ok(EditPlan::single(DocEdit::replace(
        DeclId::Method(method.method_id),
        None,
        text,
    )))
}

/// Generate a doc for an undocumented class, interface, or enum.
pub fn from_class(ctx: &FixContext<'_>, ty: &TypeDecl) -> Result<EditPlan, FixError> {
    if ty.doc.is_some() {
        return Err(FixError::precondition(
            FixKind::GenerateFromClass,
            ty.type_id,
            "type already has a doc",
        ));
    }
    let text = ctx
        .generator()
        .generate_type(ty)
        .map_err(|err| FixError::from_template(DocGenerator::type_category(ty), err))?;
    Ok(EditPlan::single(DocEdit::replace(
        DeclId::Type(ty.type_id),
        None,
        text,
    )))
}

/// Generate a doc for an undocumented field, inserted before the field.
pub fn from_field(ctx: &FixContext<'_>, field: &FieldDecl) -> Result<EditPlan, FixError> {
    if field.doc.is_some() {
        return Err(FixError::precondition(
            FixKind::GenerateFromField,
            field.field_id,
            "field already has a doc",
        ));
    }
    let text = ctx
        .generator()
        .generate_field(field)
        .map_err(|err| FixError::from_template(TemplateCategory::Field, err))?;
    Ok(EditPlan::single(DocEdit::insert_before(
        DeclId::Field(field.field_id),
        text,
    )))
}

/// Generate docs for every undocumented, checked method of a type.
///
/// Members are planned independently: a method whose template fails is
/// recorded as a failure and the remaining methods are still generated.
pub fn for_all_methods(ctx: &FixContext<'_>, ty: &TypeDecl) -> Result<EditPlan, FixError> {
    let analyzer = ctx.analyzer();
    let methods: Vec<&MethodDecl> = analyzer.undocumented_methods(ty.type_id).collect();
    if methods.is_empty() {
        return Err(FixError::precondition(
            FixKind::GenerateForAllMethods,
            ty.type_id,
            "no undocumented methods",
        ));
    }

    let generator = ctx.generator();
    let mut plan = EditPlan::independent();
    for method in methods {
        let decl = DeclId::Method(method.method_id);
        match generator.generate_method(method) {
            Ok(text) => plan.push(DocEdit::replace(decl, None, text)),
            Err(err) => {
                warn!(%decl, error = %err, "skipping method, generation failed");
                plan.record_failure(MemberFailure::new(decl, err.to_string()));
            }
        }
    }
    debug!(
        type_name = %ty.qualified_name(),
        generated = plan.edits.len(),
        failed = plan.failures.len(),
        "planned batch generation"
    );
    Ok(plan)
}
