//! The diagnostic engine.
//!
//! [`Analyzer`] is the visitor a caller drives per declaration. Each check
//! returns zero or more [`Diagnostic`]s, each carrying the fixes that apply in
//! preference order. Nothing here mutates the model; fixes are computed later
//! by [`crate::ops::compute_fix`].
//!
//! Missing documentation:
//!
//! - A type without a doc gets a kind-specific diagnostic with
//!   `generate-from-class`. Anonymous classes are never reported.
//! - A named type with at least one undocumented, checked method gets
//!   `methods-undocumented` with `generate-for-all-methods`.
//! - A field without a doc gets `field-missing-doc` with
//!   `generate-from-field`.
//! - A method without a doc is classified by where it lives and what it
//!   overrides (see [`Analyzer::determine_introduce_doc_options`]).
//!
//! Inconsistent documentation is only reported for documented, non-constructor
//! methods (see [`Analyzer::determine_doc_differences`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use docsync_core::config::AnalysisConfig;
use docsync_core::model::{
    DeclId, FieldDecl, MethodDecl, MethodId, ProgramModel, TypeDecl, TypeId, TypeKind,
};
use docsync_core::output::{DiagnosticInfo, FixInfo};

use crate::doc::{declares_inherit_tag, docs_equal, is_effectively_inherited};
use crate::hierarchy::HierarchyResolver;
use crate::reference::references_method;
use crate::templates::{DocGenerator, TemplateCategory, TemplateSource};

// ============================================================================
// Diagnostic Kinds
// ============================================================================

/// What a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    ClassMissingDoc,
    InterfaceMissingDoc,
    EnumMissingDoc,
    FieldMissingDoc,
    /// A method that overrides nothing, or only a root type method.
    BaseMethodMissingDoc,
    /// An interface method that overrides nothing.
    InterfaceMethodMissingDoc,
    /// A class method implementing an interface method.
    ImplementationMissingDoc,
    /// A method overriding a class method, or an interface method overriding
    /// another interface's method.
    OverriddenMethodMissingDoc,
    /// A method of an anonymous class with no resolvable super-member.
    AnonymousOverrideMissingDoc,
    MethodsUndocumented,
    DocDiffersFromParent,
    NoSuperToInherit,
    NoSuperDocToInherit,
}

impl DiagnosticKind {
    /// Stable code.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::ClassMissingDoc => "class-missing-doc",
            DiagnosticKind::InterfaceMissingDoc => "interface-missing-doc",
            DiagnosticKind::EnumMissingDoc => "enum-missing-doc",
            DiagnosticKind::FieldMissingDoc => "field-missing-doc",
            DiagnosticKind::BaseMethodMissingDoc => "base-method-missing-doc",
            DiagnosticKind::InterfaceMethodMissingDoc => "interface-method-missing-doc",
            DiagnosticKind::ImplementationMissingDoc => "implementation-missing-doc",
            DiagnosticKind::OverriddenMethodMissingDoc => "overridden-method-missing-doc",
            DiagnosticKind::AnonymousOverrideMissingDoc => "anonymous-override-missing-doc",
            DiagnosticKind::MethodsUndocumented => "methods-undocumented",
            DiagnosticKind::DocDiffersFromParent => "doc-differs-from-parent",
            DiagnosticKind::NoSuperToInherit => "no-super-to-inherit",
            DiagnosticKind::NoSuperDocToInherit => "no-super-doc-to-inherit",
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> &'static str {
        match self {
            DiagnosticKind::ClassMissingDoc => "Class does not have doc declaration",
            DiagnosticKind::InterfaceMissingDoc => "Interface does not have doc declaration",
            DiagnosticKind::EnumMissingDoc => "Enum does not have doc declaration",
            DiagnosticKind::FieldMissingDoc => "Field does not have doc declaration",
            DiagnosticKind::BaseMethodMissingDoc => "Method does not have doc",
            DiagnosticKind::InterfaceMethodMissingDoc => {
                "Interface method definition does not have doc"
            }
            DiagnosticKind::ImplementationMissingDoc => {
                "Interface method implementation does not have doc"
            }
            DiagnosticKind::OverriddenMethodMissingDoc => "Overridden method does not have doc",
            DiagnosticKind::AnonymousOverrideMissingDoc => {
                "Overridden method of anonymous class does not have doc"
            }
            DiagnosticKind::MethodsUndocumented => "One or more methods do not define doc",
            DiagnosticKind::DocDiffersFromParent => "Doc differs from doc in parent method",
            DiagnosticKind::NoSuperToInherit => "Cannot inherit doc because no super method exists",
            DiagnosticKind::NoSuperDocToInherit => {
                "Cannot inherit doc, super method does not declare any"
            }
        }
    }

    /// Missing-doc kind for a type.
    pub fn missing_type_doc(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Interface => DiagnosticKind::InterfaceMissingDoc,
            TypeKind::Enum => DiagnosticKind::EnumMissingDoc,
            TypeKind::Class | TypeKind::AnonymousClass => DiagnosticKind::ClassMissingDoc,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Fix Kinds
// ============================================================================

/// A named transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    AddReference,
    IntroduceReference,
    CopyFromParent,
    ReplaceParentDoc,
    MoveToParentAndIntroduceReference,
    GenerateFromSignature,
    GenerateFromClass,
    GenerateFromField,
    GenerateForAllMethods,
}

impl FixKind {
    pub const ALL: [FixKind; 9] = [
        FixKind::AddReference,
        FixKind::IntroduceReference,
        FixKind::CopyFromParent,
        FixKind::ReplaceParentDoc,
        FixKind::MoveToParentAndIntroduceReference,
        FixKind::GenerateFromSignature,
        FixKind::GenerateFromClass,
        FixKind::GenerateFromField,
        FixKind::GenerateForAllMethods,
    ];

    /// Stable id, as used on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            FixKind::AddReference => "add-reference",
            FixKind::IntroduceReference => "introduce-reference",
            FixKind::CopyFromParent => "copy-from-parent",
            FixKind::ReplaceParentDoc => "replace-parent-doc",
            FixKind::MoveToParentAndIntroduceReference => "move-to-parent-and-introduce-reference",
            FixKind::GenerateFromSignature => "generate-from-signature",
            FixKind::GenerateFromClass => "generate-from-class",
            FixKind::GenerateFromField => "generate-from-field",
            FixKind::GenerateForAllMethods => "generate-for-all-methods",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Label independent of the target.
    pub fn label(&self) -> &'static str {
        match self {
            FixKind::AddReference => "Add doc reference to parent method",
            FixKind::IntroduceReference => "Introduce doc reference to parent method",
            FixKind::CopyFromParent => "Copy doc from parent method",
            FixKind::ReplaceParentDoc => "Replace parent method doc with this doc",
            FixKind::MoveToParentAndIntroduceReference => {
                "Move doc to parent class and introduce reference"
            }
            FixKind::GenerateFromSignature => "Generate doc based on method signature",
            FixKind::GenerateFromClass => "Generate doc based on class",
            FixKind::GenerateFromField => "Generate doc based on field",
            FixKind::GenerateForAllMethods => "Generate doc for all methods",
        }
    }

    /// Fixes that need a parent method.
    pub fn needs_parent(&self) -> bool {
        matches!(
            self,
            FixKind::AddReference
                | FixKind::IntroduceReference
                | FixKind::CopyFromParent
                | FixKind::ReplaceParentDoc
                | FixKind::MoveToParentAndIntroduceReference
        )
    }
}

impl fmt::Display for FixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A fix bound to its declaration (and parent method, for sync fixes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixRequest {
    pub kind: FixKind,
    pub target: DeclId,
    /// The super-member (or virtual super) the fix works against.
    pub parent: Option<MethodId>,
}

impl FixRequest {
    pub fn new(kind: FixKind, target: DeclId) -> Self {
        FixRequest {
            kind,
            target,
            parent: None,
        }
    }

    pub fn with_parent(kind: FixKind, target: MethodId, parent: MethodId) -> Self {
        FixRequest {
            kind,
            target: DeclId::Method(target),
            parent: Some(parent),
        }
    }

    /// Label for this concrete request.
    ///
    /// `replace-parent-doc` reads "Copy doc to parent" when the parent has no
    /// doc yet; `generate-from-class` names the type kind.
    pub fn label(&self, model: &ProgramModel) -> &'static str {
        match self.kind {
            FixKind::ReplaceParentDoc => {
                let parent_has_doc = self
                    .parent
                    .and_then(|p| model.method(p))
                    .is_some_and(|m| m.doc.is_some());
                if parent_has_doc {
                    self.kind.label()
                } else {
                    "Copy doc to parent"
                }
            }
            FixKind::GenerateFromClass => match self.target {
                DeclId::Type(id) => match model.type_decl(id).map(|t| t.kind) {
                    Some(TypeKind::Interface) => "Generate doc based on interface",
                    Some(TypeKind::Enum) => "Generate doc based on enum",
                    _ => self.kind.label(),
                },
                _ => self.kind.label(),
            },
            _ => self.kind.label(),
        }
    }

    pub fn to_info(&self, model: &ProgramModel) -> FixInfo {
        FixInfo {
            id: self.kind.id().to_string(),
            label: self.label(model).to_string(),
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// One finding for one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub decl: DeclId,
    pub kind: DiagnosticKind,
    /// Offered fixes, in preference order.
    pub fixes: Vec<FixRequest>,
}

impl Diagnostic {
    pub fn new(decl: impl Into<DeclId>, kind: DiagnosticKind) -> Self {
        Diagnostic {
            decl: decl.into(),
            kind,
            fixes: Vec::new(),
        }
    }

    pub fn with_fix(mut self, fix: FixRequest) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn fix_kinds(&self) -> Vec<FixKind> {
        self.fixes.iter().map(|f| f.kind).collect()
    }

    /// Find an offered fix by kind.
    pub fn fix(&self, kind: FixKind) -> Option<&FixRequest> {
        self.fixes.iter().find(|f| f.kind == kind)
    }

    /// Output form, addressed by declaration path.
    pub fn to_info(&self, model: &ProgramModel) -> DiagnosticInfo {
        DiagnosticInfo {
            decl: model
                .decl_path(self.decl)
                .unwrap_or_else(|| self.decl.to_string()),
            code: self.kind.code().to_string(),
            message: self.kind.message().to_string(),
            fixes: self.fixes.iter().map(|f| f.to_info(model)).collect(),
        }
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Runs the documentation checks over a model.
pub struct Analyzer<'a> {
    model: &'a ProgramModel,
    config: &'a AnalysisConfig,
    templates: &'a dyn TemplateSource,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        model: &'a ProgramModel,
        config: &'a AnalysisConfig,
        templates: &'a dyn TemplateSource,
    ) -> Self {
        Analyzer {
            model,
            config,
            templates,
        }
    }

    pub fn model(&self) -> &'a ProgramModel {
        self.model
    }

    pub fn config(&self) -> &'a AnalysisConfig {
        self.config
    }

    pub fn resolver(&self) -> HierarchyResolver<'a> {
        HierarchyResolver::new(self.model, self.config.interface_scope)
    }

    // ------------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------------

    /// Returns true if the inner/anonymous filters admit this type.
    pub fn is_type_checked(&self, decl: &TypeDecl) -> bool {
        if decl.is_inner() && !self.config.check_inner_classes {
            return false;
        }
        if decl.is_anonymous() && !self.config.check_anonymous_classes {
            return false;
        }
        true
    }

    /// Returns true if the detection level and owner filters admit this method.
    pub fn is_method_checked(&self, decl: &MethodDecl) -> bool {
        self.config.admits(decl.visibility)
            && self
                .model
                .type_decl(decl.owner)
                .is_some_and(|owner| self.is_type_checked(owner))
    }

    fn is_field_checked(&self, decl: &FieldDecl) -> bool {
        self.model
            .type_decl(decl.owner)
            .is_some_and(|owner| self.is_type_checked(owner))
    }

    /// Undocumented methods of a type that the detection level admits.
    pub fn undocumented_methods(&self, ty: TypeId) -> impl Iterator<Item = &'a MethodDecl> + '_ {
        self.model
            .methods_of(ty)
            .filter(|m| m.doc.is_none() && self.config.admits(m.visibility))
    }

    // ------------------------------------------------------------------------
    // Visitor
    // ------------------------------------------------------------------------

    /// Check one declaration.
    pub fn check(&self, decl: DeclId) -> Vec<Diagnostic> {
        match decl {
            DeclId::Type(id) => self
                .model
                .type_decl(id)
                .map(|t| self.check_type(t))
                .unwrap_or_default(),
            DeclId::Method(id) => self
                .model
                .method(id)
                .map(|m| self.check_method(m))
                .unwrap_or_default(),
            DeclId::Field(id) => self
                .model
                .field(id)
                .map(|f| self.check_field(f))
                .unwrap_or_default(),
        }
    }

    /// Check every declaration: each type, then its fields, then its methods.
    pub fn check_all(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for ty in self.model.types() {
            diagnostics.extend(self.check_type(ty));
            for field in self.model.fields_of(ty.type_id) {
                diagnostics.extend(self.check_field(field));
            }
            for method in self.model.methods_of(ty.type_id) {
                diagnostics.extend(self.check_method(method));
            }
        }
        diagnostics
    }

    pub fn check_type(&self, decl: &TypeDecl) -> Vec<Diagnostic> {
        if !self.is_type_checked(decl) {
            return Vec::new();
        }
        let mut diagnostics = Vec::new();
        if decl.is_anonymous() {
            return diagnostics;
        }

        if decl.doc.is_none() {
            let mut diagnostic =
                Diagnostic::new(decl.type_id, DiagnosticKind::missing_type_doc(decl.kind));
            if self.templates.has(DocGenerator::type_category(decl)) {
                diagnostic = diagnostic.with_fix(FixRequest::new(
                    FixKind::GenerateFromClass,
                    DeclId::Type(decl.type_id),
                ));
            }
            diagnostics.push(diagnostic);
        }

        if self.undocumented_methods(decl.type_id).next().is_some() {
            diagnostics.push(
                Diagnostic::new(decl.type_id, DiagnosticKind::MethodsUndocumented).with_fix(
                    FixRequest::new(FixKind::GenerateForAllMethods, DeclId::Type(decl.type_id)),
                ),
            );
        }
        diagnostics
    }

    pub fn check_field(&self, decl: &FieldDecl) -> Vec<Diagnostic> {
        if !self.is_field_checked(decl) || decl.doc.is_some() {
            return Vec::new();
        }
        let mut diagnostic = Diagnostic::new(decl.field_id, DiagnosticKind::FieldMissingDoc);
        if self.templates.has(TemplateCategory::Field) {
            diagnostic = diagnostic.with_fix(FixRequest::new(
                FixKind::GenerateFromField,
                DeclId::Field(decl.field_id),
            ));
        }
        vec![diagnostic]
    }

    pub fn check_method(&self, decl: &MethodDecl) -> Vec<Diagnostic> {
        if !self.is_method_checked(decl) {
            return Vec::new();
        }
        let diagnostic = if decl.doc.is_none() {
            self.determine_introduce_doc_options(decl)
        } else {
            self.determine_doc_differences(decl)
        };
        diagnostic.into_iter().collect()
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    /// Classify an undocumented method and choose its fixes.
    ///
    /// | location  | super-member                | kind                    |
    /// |-----------|-----------------------------|-------------------------|
    /// | interface | exists                      | overridden method       |
    /// | class     | on an interface             | implementation          |
    /// | class     | on the root type            | base method             |
    /// | class     | elsewhere                   | overridden method       |
    /// | interface | none                        | interface method        |
    /// | anonymous | none                        | anonymous override      |
    /// | otherwise | none                        | base method             |
    ///
    /// A documented super-member offers `copy-from-parent` and
    /// `introduce-reference`; otherwise `generate-from-signature` is offered,
    /// plus `introduce-reference` against the virtual super for anonymous
    /// classes.
    pub fn determine_introduce_doc_options(&self, decl: &MethodDecl) -> Option<Diagnostic> {
        if decl.doc.is_some() {
            return None;
        }
        let owner = self.model.owner_of(decl)?;
        let resolver = self.resolver();
        let super_method = resolver.resolve_super(decl);

        let kind = match super_method {
            Some(_) if owner.is_interface() => DiagnosticKind::OverriddenMethodMissingDoc,
            Some(sup) => {
                let super_owner = self.model.owner_of(sup);
                if super_owner.is_some_and(|t| t.is_interface()) {
                    DiagnosticKind::ImplementationMissingDoc
                } else if resolver.is_from_root(sup) {
                    DiagnosticKind::BaseMethodMissingDoc
                } else {
                    DiagnosticKind::OverriddenMethodMissingDoc
                }
            }
            None if owner.is_interface() => DiagnosticKind::InterfaceMethodMissingDoc,
            None if owner.is_anonymous() => DiagnosticKind::AnonymousOverrideMissingDoc,
            None => DiagnosticKind::BaseMethodMissingDoc,
        };

        let mut diagnostic = Diagnostic::new(decl.method_id, kind);
        let generate = self
            .templates
            .has(DocGenerator::method_category(decl))
            .then(|| {
                FixRequest::new(FixKind::GenerateFromSignature, DeclId::Method(decl.method_id))
            });

        match super_method {
            Some(sup) if sup.doc.is_some() => {
                diagnostic = diagnostic
                    .with_fix(FixRequest::with_parent(
                        FixKind::CopyFromParent,
                        decl.method_id,
                        sup.method_id,
                    ))
                    .with_fix(FixRequest::with_parent(
                        FixKind::IntroduceReference,
                        decl.method_id,
                        sup.method_id,
                    ));
            }
            Some(_) => diagnostic.fixes.extend(generate),
            None => {
                diagnostic.fixes.extend(generate);
                if owner.is_anonymous() {
                    if let Some(virtual_super) = resolver.resolve_virtual_super(decl) {
                        diagnostic = diagnostic.with_fix(FixRequest::with_parent(
                            FixKind::IntroduceReference,
                            decl.method_id,
                            virtual_super.method_id,
                        ));
                    }
                }
            }
        }
        Some(diagnostic)
    }

    /// Report a documented method whose doc disagrees with its super-member.
    ///
    /// 1. No super-member, the doc declares `@inheritDoc`, and the owner is not
    ///    anonymous: nothing to inherit from.
    /// 2. A super-member not declared by the root type:
    ///    - documented, docs differ, no back-reference, not inherited:
    ///      differs, with `add-reference` and `copy-from-parent`;
    ///    - undocumented and this doc declares `@inheritDoc`: nothing to
    ///      inherit;
    ///    - undocumented and the super-member is writable: differs, with
    ///      `move-to-parent-and-introduce-reference` and `replace-parent-doc`.
    ///
    /// Constructors are never reported.
    pub fn determine_doc_differences(&self, decl: &MethodDecl) -> Option<Diagnostic> {
        let doc = decl.doc.as_deref()?;
        if decl.is_constructor {
            return None;
        }
        let owner = self.model.owner_of(decl)?;
        let resolver = self.resolver();

        let Some(sup) = resolver.resolve_super(decl) else {
            if declares_inherit_tag(doc) && !owner.is_anonymous() {
                return Some(Diagnostic::new(decl.method_id, DiagnosticKind::NoSuperToInherit));
            }
            return None;
        };
        if resolver.is_from_root(sup) {
            return None;
        }

        match sup.doc.as_deref() {
            Some(super_doc) => {
                let consistent = docs_equal(doc, super_doc)
                    || references_method(self.model, doc, sup)
                    || is_effectively_inherited(decl, Some(sup));
                if consistent {
                    return None;
                }
                Some(
                    Diagnostic::new(decl.method_id, DiagnosticKind::DocDiffersFromParent)
                        .with_fix(FixRequest::with_parent(
                            FixKind::AddReference,
                            decl.method_id,
                            sup.method_id,
                        ))
                        .with_fix(FixRequest::with_parent(
                            FixKind::CopyFromParent,
                            decl.method_id,
                            sup.method_id,
                        )),
                )
            }
            None if declares_inherit_tag(doc) => Some(Diagnostic::new(
                decl.method_id,
                DiagnosticKind::NoSuperDocToInherit,
            )),
            None if self.model.is_writable(DeclId::Method(sup.method_id)) => Some(
                Diagnostic::new(decl.method_id, DiagnosticKind::DocDiffersFromParent)
                    .with_fix(FixRequest::with_parent(
                        FixKind::MoveToParentAndIntroduceReference,
                        decl.method_id,
                        sup.method_id,
                    ))
                    .with_fix(FixRequest::with_parent(
                        FixKind::ReplaceParentDoc,
                        decl.method_id,
                        sup.method_id,
                    )),
            ),
            None => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
