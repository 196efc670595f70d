//! Program model: declared types, methods, and fields with their doc comments.
//!
//! This module provides the read-only program data model docsync analyzes:
//! - [`TypeDecl`]: Classes, interfaces, enums, and anonymous classes
//! - [`MethodDecl`]: Methods and constructors with their signatures
//! - [`FieldDecl`]: Fields
//!
//! The [`ProgramModel`] is an arena:
//! - Declarations are addressed by copyable IDs ([`TypeId`], [`MethodId`], [`FieldId`])
//! - Cross references (owner, superclass, interfaces) are IDs, never pointers
//! - Iteration order is insertion order (IDs are allocated monotonically)
//!
//! # Method Identity
//!
//! A method's identity for override matching is its name plus its ordered
//! parameter type list. Parameter names never participate. Constructors match
//! on the parameter type list alone.
//!
//! # Root Type
//!
//! The model carries the qualified name of the hierarchy root (`java.lang.Object`
//! by default). Methods declared by the root type are a terminal case for
//! inconsistency checks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Qualified name of the default hierarchy root.
pub const DEFAULT_ROOT_TYPE: &str = "java.lang.Object";

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a type declaration within a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Create a new type ID.
    pub fn new(id: u32) -> Self {
        TypeId(id)
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type_{}", self.0)
    }
}

/// Unique identifier for a method declaration within a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct MethodId(pub u32);

impl MethodId {
    /// Create a new method ID.
    pub fn new(id: u32) -> Self {
        MethodId(id)
    }
}

impl std::fmt::Display for MethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "method_{}", self.0)
    }
}

/// Unique identifier for a field declaration within a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    /// Create a new field ID.
    pub fn new(id: u32) -> Self {
        FieldId(id)
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field_{}", self.0)
    }
}

/// Any declaration that can carry a doc comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DeclId {
    Type(TypeId),
    Method(MethodId),
    Field(FieldId),
}

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclId::Type(id) => id.fmt(f),
            DeclId::Method(id) => id.fmt(f),
            DeclId::Field(id) => id.fmt(f),
        }
    }
}

impl From<TypeId> for DeclId {
    fn from(id: TypeId) -> Self {
        DeclId::Type(id)
    }
}

impl From<MethodId> for DeclId {
    fn from(id: MethodId) -> Self {
        DeclId::Method(id)
    }
}

impl From<FieldId> for DeclId {
    fn from(id: FieldId) -> Self {
        DeclId::Field(id)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Kind of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    /// Nameless class expression; carries a single base type.
    AnonymousClass,
}

/// Access level of a method.
///
/// Ordered from most to least visible, so `Public < Private`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    /// Package-private.
    Default,
    Private,
}

impl Visibility {
    /// Returns true if a member with this visibility is admitted by a
    /// detection level (`level = Protected` admits public and protected).
    pub fn within(self, level: Visibility) -> bool {
        self <= level
    }

    /// Keyword-style name used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Default => "default",
            Visibility::Private => "private",
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A class, interface, enum, or anonymous class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub type_id: TypeId,
    pub kind: TypeKind,
    /// Dotted package name; empty for the default package.
    pub package: String,
    /// Simple name. Anonymous classes carry a host-assigned name (e.g. `Outer$1`).
    pub name: String,
    pub superclass: Option<TypeId>,
    /// Implemented interfaces for classes, extended interfaces for interfaces.
    pub interfaces: Vec<TypeId>,
    /// Base type of an anonymous class.
    pub base: Option<TypeId>,
    /// Enclosing type for inner and anonymous classes.
    pub outer: Option<TypeId>,
    pub doc: Option<String>,
    /// Whether the file holding this type accepts doc edits.
    pub writable: bool,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
}

impl TypeDecl {
    /// Create a new type declaration with no members.
    pub fn new(
        type_id: TypeId,
        kind: TypeKind,
        package: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        TypeDecl {
            type_id,
            kind,
            package: package.into(),
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            base: None,
            outer: None,
            doc: None,
            writable: true,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the superclass.
    pub fn with_superclass(mut self, superclass: TypeId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Append an implemented or extended interface.
    pub fn with_interface(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Set the base type of an anonymous class.
    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    /// Set the enclosing type.
    pub fn with_outer(mut self, outer: TypeId) -> Self {
        self.outer = Some(outer);
        self
    }

    /// Set the doc comment.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Mark the type as living in a read-only file.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Fully qualified name (`pkg.Name`, or `Name` in the default package).
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind == TypeKind::AnonymousClass
    }

    /// Inner (nested, non-anonymous) type.
    pub fn is_inner(&self) -> bool {
        self.outer.is_some() && !self.is_anonymous()
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name; only used when generating docs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Type signature as written (`int`, `java.util.List<String>`).
    #[serde(rename = "type")]
    pub ty: String,
}

impl Parameter {
    /// Create an unnamed parameter.
    pub fn new(ty: impl Into<String>) -> Self {
        Parameter {
            name: None,
            ty: ty.into(),
        }
    }

    /// Create a named parameter.
    pub fn named(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Parameter {
            name: Some(name.into()),
            ty: ty.into(),
        }
    }
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub method_id: MethodId,
    pub owner: TypeId,
    pub name: String,
    pub is_constructor: bool,
    pub is_static: bool,
    pub params: Vec<Parameter>,
    /// Return type; `None` for constructors and `void`.
    pub return_type: Option<String>,
    /// Declared throwable type names, in declaration order.
    pub throws: Vec<String>,
    pub visibility: Visibility,
    pub doc: Option<String>,
}

impl MethodDecl {
    /// Create a new public, void, parameterless method.
    pub fn new(method_id: MethodId, owner: TypeId, name: impl Into<String>) -> Self {
        MethodDecl {
            method_id,
            owner,
            name: name.into(),
            is_constructor: false,
            is_static: false,
            params: Vec::new(),
            return_type: None,
            throws: Vec::new(),
            visibility: Visibility::Public,
            doc: None,
        }
    }

    /// Create a new constructor.
    pub fn constructor(method_id: MethodId, owner: TypeId, name: impl Into<String>) -> Self {
        MethodDecl {
            is_constructor: true,
            ..MethodDecl::new(method_id, owner, name)
        }
    }

    /// Append a parameter.
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type. `void` is stored as no return type.
    pub fn with_return(mut self, ty: impl Into<String>) -> Self {
        self.return_type = normalize_return_type(ty.into());
        self
    }

    /// Append a declared throwable.
    pub fn with_throws(mut self, ty: impl Into<String>) -> Self {
        self.throws.push(ty.into());
        self
    }

    /// Set the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark the method static.
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set the doc comment.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Parameter type signatures in declaration order.
    pub fn param_types(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.ty.as_str())
    }

    /// Returns true if `other` has the same parameter type list.
    ///
    /// Whitespace inside type signatures is not significant.
    pub fn same_param_types(&self, other: &MethodDecl) -> bool {
        self.params.len() == other.params.len()
            && self
                .param_types()
                .zip(other.param_types())
                .all(|(a, b)| signature_eq(a, b))
    }

    /// Returns true if `other` overrides or implements this method
    /// structurally: same name and parameter types, or for constructors,
    /// same parameter types alone.
    pub fn matches_signature(&self, other: &MethodDecl) -> bool {
        if self.is_constructor || other.is_constructor {
            return self.is_constructor == other.is_constructor && self.same_param_types(other);
        }
        self.name == other.name && self.same_param_types(other)
    }
}

/// Map a written return type to the stored form (`void` becomes `None`).
pub fn normalize_return_type(ty: String) -> Option<String> {
    let trimmed = ty.trim();
    if trimmed.is_empty() || trimmed == "void" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn signature_eq(a: &str, b: &str) -> bool {
    a.chars()
        .filter(|c| !c.is_whitespace())
        .eq(b.chars().filter(|c| !c.is_whitespace()))
}

/// A field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub field_id: FieldId,
    pub owner: TypeId,
    pub name: String,
    pub ty: Option<String>,
    pub doc: Option<String>,
}

impl FieldDecl {
    pub fn new(field_id: FieldId, owner: TypeId, name: impl Into<String>) -> Self {
        FieldDecl {
            field_id,
            owner,
            name: name.into(),
            ty: None,
            doc: None,
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building or addressing a [`ProgramModel`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate type: {name}")]
    DuplicateType { name: String },

    #[error("unknown type: {name}")]
    UnknownType { name: String },

    #[error("unknown declaration: {id}")]
    UnknownDeclaration { id: DeclId },
}

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

// ============================================================================
// ProgramModel
// ============================================================================

/// Arena of declarations for one analysis pass.
#[derive(Debug, Clone)]
pub struct ProgramModel {
    // Primary storage (BTreeMap for deterministic iteration)
    types: BTreeMap<TypeId, TypeDecl>,
    methods: BTreeMap<MethodId, MethodDecl>,
    fields: BTreeMap<FieldId, FieldDecl>,

    // Secondary indexes
    /// Map from qualified name to TypeId.
    type_by_name: HashMap<String, TypeId>,

    root_type_name: String,

    next_type_id: u32,
    next_method_id: u32,
    next_field_id: u32,
}

impl Default for ProgramModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramModel {
    /// Create an empty model rooted at `java.lang.Object`.
    pub fn new() -> Self {
        ProgramModel {
            types: BTreeMap::new(),
            methods: BTreeMap::new(),
            fields: BTreeMap::new(),
            type_by_name: HashMap::new(),
            root_type_name: DEFAULT_ROOT_TYPE.to_string(),
            next_type_id: 0,
            next_method_id: 0,
            next_field_id: 0,
        }
    }

    /// Use a different hierarchy root.
    pub fn with_root_type_name(mut self, name: impl Into<String>) -> Self {
        self.root_type_name = name.into();
        self
    }

    pub fn root_type_name(&self) -> &str {
        &self.root_type_name
    }

    // ------------------------------------------------------------------------
    // ID generation
    // ------------------------------------------------------------------------

    /// Generate the next TypeId.
    pub fn next_type_id(&mut self) -> TypeId {
        let id = TypeId::new(self.next_type_id);
        self.next_type_id += 1;
        id
    }

    /// Generate the next MethodId.
    pub fn next_method_id(&mut self) -> MethodId {
        let id = MethodId::new(self.next_method_id);
        self.next_method_id += 1;
        id
    }

    /// Generate the next FieldId.
    pub fn next_field_id(&mut self) -> FieldId {
        let id = FieldId::new(self.next_field_id);
        self.next_field_id += 1;
        id
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Insert a type declaration.
    ///
    /// Member lists on the inserted declaration are kept; members inserted
    /// later are appended to them.
    pub fn insert_type(&mut self, decl: TypeDecl) -> ModelResult<TypeId> {
        let qualified = decl.qualified_name();
        if self.type_by_name.contains_key(&qualified) {
            return Err(ModelError::DuplicateType { name: qualified });
        }
        let id = decl.type_id;
        self.type_by_name.insert(qualified, id);
        self.types.insert(id, decl);
        Ok(id)
    }

    /// Insert a method and register it with its owning type.
    pub fn insert_method(&mut self, decl: MethodDecl) -> ModelResult<MethodId> {
        let id = decl.method_id;
        let owner = self
            .types
            .get_mut(&decl.owner)
            .ok_or(ModelError::UnknownDeclaration {
                id: DeclId::Type(decl.owner),
            })?;
        owner.methods.push(id);
        self.methods.insert(id, decl);
        Ok(id)
    }

    /// Insert a field and register it with its owning type.
    pub fn insert_field(&mut self, decl: FieldDecl) -> ModelResult<FieldId> {
        let id = decl.field_id;
        let owner = self
            .types
            .get_mut(&decl.owner)
            .ok_or(ModelError::UnknownDeclaration {
                id: DeclId::Type(decl.owner),
            })?;
        owner.fields.push(id);
        self.fields.insert(id, decl);
        Ok(id)
    }

    /// Set the superclass of an already inserted type.
    pub fn set_superclass(&mut self, child: TypeId, parent: TypeId) -> ModelResult<()> {
        self.type_mut(child)?.superclass = Some(parent);
        Ok(())
    }

    /// Append an interface to an already inserted type.
    pub fn add_interface(&mut self, child: TypeId, interface: TypeId) -> ModelResult<()> {
        self.type_mut(child)?.interfaces.push(interface);
        Ok(())
    }

    /// Set the base type of an already inserted anonymous class.
    pub fn set_base(&mut self, child: TypeId, base: TypeId) -> ModelResult<()> {
        self.type_mut(child)?.base = Some(base);
        Ok(())
    }

    /// Set the enclosing type of an already inserted type.
    pub fn set_outer(&mut self, child: TypeId, outer: TypeId) -> ModelResult<()> {
        self.type_mut(child)?.outer = Some(outer);
        Ok(())
    }

    /// Mark a type's file as writable or read-only.
    pub fn set_writable(&mut self, id: TypeId, writable: bool) -> ModelResult<()> {
        self.type_mut(id)?.writable = writable;
        Ok(())
    }

    /// Mutable access to a method.
    ///
    /// The owner and name are indexed elsewhere and must not be changed
    /// through this reference.
    pub fn method_mut(&mut self, id: MethodId) -> Option<&mut MethodDecl> {
        self.methods.get_mut(&id)
    }

    fn type_mut(&mut self, id: TypeId) -> ModelResult<&mut TypeDecl> {
        self.types.get_mut(&id).ok_or(ModelError::UnknownDeclaration {
            id: DeclId::Type(id),
        })
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Get a type by ID.
    pub fn type_decl(&self, id: TypeId) -> Option<&TypeDecl> {
        self.types.get(&id)
    }

    /// Get a method by ID.
    pub fn method(&self, id: MethodId) -> Option<&MethodDecl> {
        self.methods.get(&id)
    }

    /// Get a field by ID.
    pub fn field(&self, id: FieldId) -> Option<&FieldDecl> {
        self.fields.get(&id)
    }

    /// Look up a type by qualified name.
    pub fn type_by_name(&self, qualified: &str) -> Option<&TypeDecl> {
        self.type_by_name
            .get(qualified)
            .and_then(|id| self.types.get(id))
    }

    /// Owning type of a method.
    pub fn owner_of(&self, method: &MethodDecl) -> Option<&TypeDecl> {
        self.types.get(&method.owner)
    }

    /// Methods declared directly by a type, in declaration order.
    pub fn methods_of(&self, ty: TypeId) -> impl Iterator<Item = &MethodDecl> {
        self.types
            .get(&ty)
            .map(|t| t.methods.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.methods.get(id))
    }

    /// Fields declared directly by a type, in declaration order.
    pub fn fields_of(&self, ty: TypeId) -> impl Iterator<Item = &FieldDecl> {
        self.types
            .get(&ty)
            .map(|t| t.fields.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.fields.get(id))
    }

    /// Field of a type by name.
    pub fn field_named(&self, ty: TypeId, name: &str) -> Option<&FieldDecl> {
        self.fields_of(ty).find(|f| f.name == name)
    }

    /// Iterate over all types in deterministic order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }

    /// Iterate over all methods in deterministic order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.values()
    }

    /// Iterate over all fields in deterministic order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.values()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the declaration exists in this model.
    pub fn contains(&self, decl: DeclId) -> bool {
        match decl {
            DeclId::Type(id) => self.types.contains_key(&id),
            DeclId::Method(id) => self.methods.contains_key(&id),
            DeclId::Field(id) => self.fields.contains_key(&id),
        }
    }

    /// Current doc text of a declaration.
    pub fn doc(&self, decl: DeclId) -> Option<&str> {
        match decl {
            DeclId::Type(id) => self.types.get(&id).and_then(|t| t.doc.as_deref()),
            DeclId::Method(id) => self.methods.get(&id).and_then(|m| m.doc.as_deref()),
            DeclId::Field(id) => self.fields.get(&id).and_then(|f| f.doc.as_deref()),
        }
    }

    /// Type whose file holds the declaration.
    pub fn container_of(&self, decl: DeclId) -> Option<TypeId> {
        match decl {
            DeclId::Type(id) => self.types.contains_key(&id).then_some(id),
            DeclId::Method(id) => self.methods.get(&id).map(|m| m.owner),
            DeclId::Field(id) => self.fields.get(&id).map(|f| f.owner),
        }
    }

    /// Returns true if the declaration's file accepts doc edits.
    pub fn is_writable(&self, decl: DeclId) -> bool {
        self.container_of(decl)
            .and_then(|id| self.types.get(&id))
            .is_some_and(|t| t.writable)
    }

    /// Returns true if the type is the hierarchy root.
    ///
    /// Types without a package also match on the root's simple name, for
    /// hosts that do not record packages.
    pub fn is_root_type(&self, id: TypeId) -> bool {
        let Some(ty) = self.types.get(&id) else {
            return false;
        };
        if ty.qualified_name() == self.root_type_name {
            return true;
        }
        let simple_root = self
            .root_type_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.root_type_name);
        ty.package.is_empty() && ty.name == simple_root
    }

    /// Mutable doc slot of a declaration.
    pub(crate) fn doc_slot_mut(&mut self, decl: DeclId) -> Option<&mut Option<String>> {
        match decl {
            DeclId::Type(id) => self.types.get_mut(&id).map(|t| &mut t.doc),
            DeclId::Method(id) => self.methods.get_mut(&id).map(|m| &mut m.doc),
            DeclId::Field(id) => self.fields.get_mut(&id).map(|f| &mut f.doc),
        }
    }

    // ------------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------------

    /// Textual address of a declaration.
    ///
    /// - type: `pkg.Type`
    /// - field: `pkg.Type#field`
    /// - method: `pkg.Type#name(T1, T2)`
    pub fn decl_path(&self, decl: DeclId) -> Option<String> {
        match decl {
            DeclId::Type(id) => self.types.get(&id).map(|t| t.qualified_name()),
            DeclId::Field(id) => {
                let field = self.fields.get(&id)?;
                let owner = self.types.get(&field.owner)?;
                Some(format!("{}#{}", owner.qualified_name(), field.name))
            }
            DeclId::Method(id) => {
                let method = self.methods.get(&id)?;
                let owner = self.types.get(&method.owner)?;
                Some(format!(
                    "{}#{}({})",
                    owner.qualified_name(),
                    method.name,
                    method.param_types().collect::<Vec<_>>().join(", ")
                ))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn class(model: &mut ProgramModel, package: &str, name: &str) -> TypeId {
        let id = model.next_type_id();
        model
            .insert_type(TypeDecl::new(id, TypeKind::Class, package, name))
            .unwrap()
    }

    mod model_tests {
        use super::*;

        #[test]
        fn insert_and_lookup_type() {
            let mut model = ProgramModel::new();
            let id = class(&mut model, "p1.p2", "Foo");

            let ty = model.type_decl(id).unwrap();
            assert_eq!(ty.qualified_name(), "p1.p2.Foo");
            assert_eq!(model.type_by_name("p1.p2.Foo").unwrap().type_id, id);
            assert!(ty.writable);
        }

        #[test]
        fn duplicate_type_rejected() {
            let mut model = ProgramModel::new();
            class(&mut model, "p1", "Foo");
            let id = model.next_type_id();
            let err = model
                .insert_type(TypeDecl::new(id, TypeKind::Interface, "p1", "Foo"))
                .unwrap_err();
            assert_eq!(
                err,
                ModelError::DuplicateType {
                    name: "p1.Foo".to_string()
                }
            );
        }

        #[test]
        fn members_registered_with_owner_in_order() {
            let mut model = ProgramModel::new();
            let ty = class(&mut model, "p1", "Foo");
            let a = model.next_method_id();
            model.insert_method(MethodDecl::new(a, ty, "a")).unwrap();
            let b = model.next_method_id();
            model.insert_method(MethodDecl::new(b, ty, "b")).unwrap();
            let f = model.next_field_id();
            model.insert_field(FieldDecl::new(f, ty, "x")).unwrap();

            let names: Vec<_> = model.methods_of(ty).map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b"]);
            assert_eq!(model.field_named(ty, "x").unwrap().field_id, f);
            assert!(model.field_named(ty, "y").is_none());
        }

        #[test]
        fn member_of_unknown_type_rejected() {
            let mut model = ProgramModel::new();
            let id = model.next_method_id();
            let err = model
                .insert_method(MethodDecl::new(id, TypeId::new(9), "a"))
                .unwrap_err();
            assert!(matches!(err, ModelError::UnknownDeclaration { .. }));
        }

        #[test]
        fn root_type_detection() {
            let mut model = ProgramModel::new();
            let object = class(&mut model, "java.lang", "Object");
            let bare = class(&mut model, "", "Object");
            let other = class(&mut model, "p1", "Object");
            assert!(model.is_root_type(object));
            assert!(model.is_root_type(bare));
            assert!(!model.is_root_type(other));
        }

        #[test]
        fn writable_follows_container() {
            let mut model = ProgramModel::new();
            let id = model.next_type_id();
            let ty = model
                .insert_type(TypeDecl::new(id, TypeKind::Class, "lib", "Sealed").read_only())
                .unwrap();
            let m = model.next_method_id();
            model.insert_method(MethodDecl::new(m, ty, "run")).unwrap();
            assert!(!model.is_writable(DeclId::Method(m)));
        }

        #[test]
        fn decl_paths() {
            let mut model = ProgramModel::new();
            let ty = class(&mut model, "p1", "Foo");
            let m = model.next_method_id();
            model
                .insert_method(
                    MethodDecl::new(m, ty, "put")
                        .with_param(Parameter::named("key", "int"))
                        .with_param(Parameter::new("long")),
                )
                .unwrap();
            let f = model.next_field_id();
            model.insert_field(FieldDecl::new(f, ty, "size")).unwrap();

            assert_eq!(model.decl_path(ty.into()).unwrap(), "p1.Foo");
            assert_eq!(model.decl_path(m.into()).unwrap(), "p1.Foo#put(int, long)");
            assert_eq!(model.decl_path(f.into()).unwrap(), "p1.Foo#size");
        }
    }

    mod signature_tests {
        use super::*;

        fn method(name: &str, params: &[&str]) -> MethodDecl {
            let mut m = MethodDecl::new(MethodId::new(0), TypeId::new(0), name);
            for p in params {
                m = m.with_param(Parameter::new(*p));
            }
            m
        }

        #[test]
        fn same_name_and_params_match() {
            assert!(method("f", &["int", "long"]).matches_signature(&method("f", &["int", "long"])));
        }

        #[test]
        fn parameter_names_ignored() {
            let a = MethodDecl::new(MethodId::new(0), TypeId::new(0), "f")
                .with_param(Parameter::named("a", "int"));
            let b = MethodDecl::new(MethodId::new(1), TypeId::new(1), "f")
                .with_param(Parameter::named("b", "int"));
            assert!(a.matches_signature(&b));
        }

        #[test]
        fn whitespace_in_types_ignored() {
            assert!(method("f", &["Map<String, Integer>"])
                .matches_signature(&method("f", &["Map<String,Integer>"])));
        }

        #[test]
        fn different_name_or_params_do_not_match() {
            assert!(!method("f", &["int"]).matches_signature(&method("g", &["int"])));
            assert!(!method("f", &["int"]).matches_signature(&method("f", &["long"])));
            assert!(!method("f", &["int"]).matches_signature(&method("f", &[])));
        }

        #[test]
        fn constructors_match_on_params_only() {
            let a = MethodDecl::constructor(MethodId::new(0), TypeId::new(0), "Base")
                .with_param(Parameter::new("int"));
            let b = MethodDecl::constructor(MethodId::new(1), TypeId::new(1), "Child")
                .with_param(Parameter::new("int"));
            assert!(a.matches_signature(&b));
            assert!(!a.matches_signature(&method("Base", &["int"])));
        }

        #[test]
        fn void_return_is_none() {
            let m = method("f", &[]).with_return("void");
            assert!(m.return_type.is_none());
            let m = method("f", &[]).with_return("String");
            assert_eq!(m.return_type.as_deref(), Some("String"));
        }
    }

    mod visibility_tests {
        use super::*;

        #[test]
        fn detection_levels() {
            assert!(Visibility::Public.within(Visibility::Public));
            assert!(!Visibility::Protected.within(Visibility::Public));
            assert!(Visibility::Default.within(Visibility::Default));
            assert!(Visibility::Private.within(Visibility::Private));
            assert!(Visibility::Public.within(Visibility::Private));
        }
    }
}
