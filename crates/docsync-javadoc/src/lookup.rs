//! Declaration paths.
//!
//! A path addresses one declaration in a [`ProgramModel`]:
//!
//! - `pkg.Type` names a type
//! - `pkg.Type#field` names a field (or a method, if only one has that name)
//! - `pkg.Type#method(T1, T2)` names a method or constructor
//!
//! Whitespace around names and inside parameter types is ignored. The type
//! part may also be a simple name when exactly one type carries it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use docsync_core::model::{DeclId, MethodDecl, ProgramModel, TypeDecl};

/// Errors resolving a declaration path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("invalid declaration path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("declaration not found: {path}")]
    NotFound { path: String },

    #[error("declaration path '{path}' is ambiguous ({} candidates)", candidates.len())]
    Ambiguous {
        path: String,
        candidates: Vec<String>,
    },
}

/// The member part of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberPath {
    /// `#name`: a field, or a method when unambiguous.
    Name(String),
    /// `#name(T1, T2)`.
    Method { name: String, params: Vec<String> },
}

/// A parsed declaration path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclPath {
    pub type_name: String,
    pub member: Option<MemberPath>,
}

fn squash(ty: &str) -> String {
    ty.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split a parameter list on commas outside generic brackets.
fn split_params(list: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in list.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(squash(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    params.push(squash(&current));
    params
}

impl DeclPath {
    pub fn parse(path: &str) -> Result<Self, LookupError> {
        let invalid = |reason: &str| LookupError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let (type_part, member_part) = match path.split_once('#') {
            Some((ty, member)) => (ty.trim(), Some(member.trim())),
            None => (path.trim(), None),
        };
        if type_part.is_empty() {
            return Err(invalid("missing type name"));
        }
        if type_part.chars().any(char::is_whitespace) {
            return Err(invalid("type name contains whitespace"));
        }

        let member = match member_part {
            None => None,
            Some("") => return Err(invalid("missing member name after '#'")),
            Some(member) => match member.split_once('(') {
                None => Some(MemberPath::Name(member.to_string())),
                Some((name, rest)) => {
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(invalid("missing method name"));
                    }
                    let Some(list) = rest.trim_end().strip_suffix(')') else {
                        return Err(invalid("unterminated parameter list"));
                    };
                    let params = if list.trim().is_empty() {
                        Vec::new()
                    } else {
                        split_params(list)
                    };
                    if params.iter().any(String::is_empty) {
                        return Err(invalid("empty parameter type"));
                    }
                    Some(MemberPath::Method {
                        name: name.to_string(),
                        params,
                    })
                }
            },
        };

        Ok(DeclPath {
            type_name: type_part.to_string(),
            member,
        })
    }

    /// Resolve against a model.
    pub fn resolve(&self, model: &ProgramModel) -> Result<DeclId, LookupError> {
        let owner = self.resolve_type(model)?;
        let Some(member) = &self.member else {
            return Ok(DeclId::Type(owner.type_id));
        };

        match member {
            MemberPath::Name(name) => {
                if let Some(field) = model.field_named(owner.type_id, name) {
                    return Ok(DeclId::Field(field.field_id));
                }
                let methods: Vec<&MethodDecl> = model
                    .methods_of(owner.type_id)
                    .filter(|m| &m.name == name)
                    .collect();
                self.single(model, methods)
            }
            MemberPath::Method { name, params } => {
                let methods: Vec<&MethodDecl> = model
                    .methods_of(owner.type_id)
                    .filter(|m| &m.name == name)
                    .filter(|m| {
                        m.params.len() == params.len()
                            && m.param_types().zip(params).all(|(a, b)| squash(a) == *b)
                    })
                    .collect();
                self.single(model, methods)
            }
        }
    }

    fn resolve_type<'m>(&self, model: &'m ProgramModel) -> Result<&'m TypeDecl, LookupError> {
        if let Some(ty) = model.type_by_name(&self.type_name) {
            return Ok(ty);
        }
        let matches: Vec<&TypeDecl> = model
            .types()
            .filter(|t| t.name == self.type_name)
            .collect();
        match matches.as_slice() {
            [] => Err(LookupError::NotFound {
                path: self.to_string(),
            }),
            [one] => Ok(*one),
            _ => Err(LookupError::Ambiguous {
                path: self.to_string(),
                candidates: matches.iter().map(|t| t.qualified_name()).collect(),
            }),
        }
    }

    fn single(
        &self,
        model: &ProgramModel,
        methods: Vec<&MethodDecl>,
    ) -> Result<DeclId, LookupError> {
        match methods.as_slice() {
            [] => Err(LookupError::NotFound {
                path: self.to_string(),
            }),
            [one] => Ok(DeclId::Method(one.method_id)),
            _ => Err(LookupError::Ambiguous {
                path: self.to_string(),
                candidates: methods
                    .iter()
                    .filter_map(|m| model.decl_path(DeclId::Method(m.method_id)))
                    .collect(),
            }),
        }
    }
}

impl FromStr for DeclPath {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeclPath::parse(s)
    }
}

impl fmt::Display for DeclPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        match &self.member {
            None => Ok(()),
            Some(MemberPath::Name(name)) => write!(f, "#{}", name),
            Some(MemberPath::Method { name, params }) => {
                write!(f, "#{}({})", name, params.join(", "))
            }
        }
    }
}

/// Parse and resolve a path in one step.
pub fn resolve_path(model: &ProgramModel, path: &str) -> Result<DeclId, LookupError> {
    DeclPath::parse(path)?.resolve(model)
}
