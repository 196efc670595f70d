//! Model snapshot adapter and the doc write-back hook.
//!
//! Hosts describe their program as a [`ModelBundle`]: a serde-friendly
//! snapshot that references types by qualified name rather than by ID. The
//! integration layer converts it into a [`ProgramModel`] with
//! [`ProgramModel::from_bundle`], which allocates all IDs.
//!
//! # Name Resolution
//!
//! Type references (`superclass`, `interfaces`, `base`, `outer`) are resolved
//! after every type in the bundle has been registered, so declaration order in
//! the bundle does not matter. A reference is tried as a qualified name first,
//! then relative to the referring type's package. A reference that matches no
//! type in the bundle is dropped with a warning; it is a resolution miss, not
//! an error.
//!
//! # Write-Back
//!
//! Doc edits reach the host through [`DocWriteBack`]. [`ProgramModel`]
//! implements it directly so a snapshot can be edited in memory and written
//! out again with [`ModelBundle::from_model`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{
    normalize_return_type, DeclId, FieldDecl, MethodDecl, ModelResult, Parameter, ProgramModel,
    TypeDecl, TypeId, TypeKind, Visibility,
};

// ============================================================================
// Snapshot Types
// ============================================================================

/// Serializable snapshot of a program model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    /// Qualified name of the hierarchy root; defaults to `java.lang.Object`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_type: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeData>,
}

/// Snapshot of one type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeData {
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub package: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default = "default_writable")]
    pub writable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodData>,
}

fn default_writable() -> bool {
    true
}

/// Snapshot of one method or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodData {
    pub name: String,
    #[serde(default)]
    pub constructor: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub throws: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Snapshot of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

// ============================================================================
// Bundle -> Model
// ============================================================================

impl ProgramModel {
    /// Build a model from a snapshot, allocating all IDs.
    pub fn from_bundle(bundle: &ModelBundle) -> ModelResult<ProgramModel> {
        let mut model = ProgramModel::new();
        if let Some(root) = &bundle.root_type {
            model = model.with_root_type_name(root.clone());
        }

        // Pass 1: register every type with its members.
        let mut ids = Vec::with_capacity(bundle.types.len());
        for data in &bundle.types {
            let type_id = model.next_type_id();
            let mut decl = TypeDecl::new(type_id, data.kind, &data.package, &data.name);
            decl.doc = data.doc.clone();
            decl.writable = data.writable;
            model.insert_type(decl)?;
            ids.push(type_id);

            for field in &data.fields {
                let field_id = model.next_field_id();
                let mut decl = FieldDecl::new(field_id, type_id, &field.name);
                decl.ty = field.ty.clone();
                decl.doc = field.doc.clone();
                model.insert_field(decl)?;
            }

            for method in &data.methods {
                let method_id = model.next_method_id();
                let mut decl = if method.constructor {
                    MethodDecl::constructor(method_id, type_id, &method.name)
                } else {
                    MethodDecl::new(method_id, type_id, &method.name)
                };
                decl.is_static = method.is_static;
                decl.params = method.params.clone();
                decl.return_type = method.return_type.clone().and_then(normalize_return_type);
                decl.throws = method.throws.clone();
                decl.visibility = method.visibility;
                decl.doc = method.doc.clone();
                model.insert_method(decl)?;
            }
        }

        // Pass 2: resolve type references by name.
        for (data, &type_id) in bundle.types.iter().zip(&ids) {
            if let Some(name) = &data.superclass {
                if let Some(parent) = resolve_reference(&model, &data.package, name, &data.name) {
                    model.set_superclass(type_id, parent)?;
                }
            }
            for name in &data.interfaces {
                if let Some(interface) = resolve_reference(&model, &data.package, name, &data.name)
                {
                    model.add_interface(type_id, interface)?;
                }
            }
            if let Some(name) = &data.base {
                if let Some(base) = resolve_reference(&model, &data.package, name, &data.name) {
                    model.set_base(type_id, base)?;
                }
            }
            if let Some(name) = &data.outer {
                if let Some(outer) = resolve_reference(&model, &data.package, name, &data.name) {
                    model.set_outer(type_id, outer)?;
                }
            }
        }

        Ok(model)
    }
}

fn resolve_reference(
    model: &ProgramModel,
    package: &str,
    name: &str,
    referrer: &str,
) -> Option<TypeId> {
    if let Some(ty) = model.type_by_name(name) {
        return Some(ty.type_id);
    }
    if !package.is_empty() {
        let relative = format!("{}.{}", package, name);
        if let Some(ty) = model.type_by_name(&relative) {
            return Some(ty.type_id);
        }
    }
    warn!(reference = name, referrer, "dropping unresolved type reference");
    None
}

// ============================================================================
// Model -> Bundle
// ============================================================================

impl ModelBundle {
    /// Snapshot a model, e.g. after doc edits were applied.
    pub fn from_model(model: &ProgramModel) -> ModelBundle {
        let name_of = |id: TypeId| model.type_decl(id).map(|t| t.qualified_name());

        let types = model
            .types()
            .map(|ty| TypeData {
                kind: ty.kind,
                package: ty.package.clone(),
                name: ty.name.clone(),
                superclass: ty.superclass.and_then(name_of),
                interfaces: ty.interfaces.iter().filter_map(|&i| name_of(i)).collect(),
                base: ty.base.and_then(name_of),
                outer: ty.outer.and_then(name_of),
                doc: ty.doc.clone(),
                writable: ty.writable,
                fields: model
                    .fields_of(ty.type_id)
                    .map(|f| FieldData {
                        name: f.name.clone(),
                        ty: f.ty.clone(),
                        doc: f.doc.clone(),
                    })
                    .collect(),
                methods: model
                    .methods_of(ty.type_id)
                    .map(|m| MethodData {
                        name: m.name.clone(),
                        constructor: m.is_constructor,
                        is_static: m.is_static,
                        params: m.params.clone(),
                        return_type: m.return_type.clone(),
                        throws: m.throws.clone(),
                        visibility: m.visibility,
                        doc: m.doc.clone(),
                    })
                    .collect(),
            })
            .collect();

        let root_type = (model.root_type_name() != crate::model::DEFAULT_ROOT_TYPE)
            .then(|| model.root_type_name().to_string());

        ModelBundle { root_type, types }
    }
}

// ============================================================================
// Write-Back
// ============================================================================

/// Errors raised by a host when it rejects a doc edit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteBackError {
    /// The doc changed since the edit was computed.
    #[error("doc of {decl} changed since the edit was computed (expected {expected}, found {actual})")]
    StaleDoc {
        decl: DeclId,
        expected: String,
        actual: String,
    },

    /// The declaration lives in a read-only file.
    #[error("{decl} is not writable")]
    ReadOnly { decl: DeclId },

    /// The declaration does not exist in the host model.
    #[error("unknown declaration: {decl}")]
    UnknownDeclaration { decl: DeclId },

    /// The host refused the edit for its own reasons.
    #[error("write to {decl} rejected: {reason}")]
    Rejected { decl: DeclId, reason: String },
}

impl WriteBackError {
    /// Declaration the failed write targeted.
    pub fn decl(&self) -> DeclId {
        match self {
            WriteBackError::StaleDoc { decl, .. }
            | WriteBackError::ReadOnly { decl }
            | WriteBackError::UnknownDeclaration { decl }
            | WriteBackError::Rejected { decl, .. } => *decl,
        }
    }
}

/// Host hook that receives computed doc text.
///
/// Implementations replace the doc slot of a declaration wholesale. Inserting
/// a doc where none existed is a replace of an empty slot.
pub trait DocWriteBack {
    /// Current doc text of a declaration, used to verify edit preconditions.
    fn current_doc(&self, decl: DeclId) -> Option<&str>;

    /// Whether a write to the declaration would be accepted.
    fn can_write(&self, _decl: DeclId) -> bool {
        true
    }

    /// Replace the doc of a declaration.
    fn set_doc(&mut self, decl: DeclId, text: String) -> Result<(), WriteBackError>;
}

impl DocWriteBack for ProgramModel {
    fn current_doc(&self, decl: DeclId) -> Option<&str> {
        self.doc(decl)
    }

    fn can_write(&self, decl: DeclId) -> bool {
        self.contains(decl) && self.is_writable(decl)
    }

    fn set_doc(&mut self, decl: DeclId, text: String) -> Result<(), WriteBackError> {
        if !self.contains(decl) {
            return Err(WriteBackError::UnknownDeclaration { decl });
        }
        if !self.is_writable(decl) {
            return Err(WriteBackError::ReadOnly { decl });
        }
        let slot = self
            .doc_slot_mut(decl)
            .ok_or(WriteBackError::UnknownDeclaration { decl })?;
        *slot = Some(text);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
