//! `@see` back-reference generation and detection.
//!
//! A back-reference from a method to its super-member reads
//!
//! ```text
//! @see [package.]SimpleType#method(ParamType1, ParamType2)
//! ```
//!
//! The package qualifier is written only when the two methods live in
//! different packages. Detection accepts the qualifier either way and treats
//! whitespace inside the parameter list as insignificant.

use regex::Regex;
use tracing::debug;

use docsync_core::model::{MethodDecl, ProgramModel};

use crate::doc::{DocComment, SEE_TAG};

/// Build the `@see` tag pointing from `from` to `target`.
///
/// Same-package references stay unqualified on purpose. Do not switch this
/// to always-qualified names.
pub fn reference_tag(model: &ProgramModel, from: &MethodDecl, target: &MethodDecl) -> String {
    let from_package = model
        .owner_of(from)
        .map(|t| t.package.as_str())
        .unwrap_or_default();
    let (target_package, target_type) = model
        .owner_of(target)
        .map(|t| (t.package.as_str(), t.name.as_str()))
        .unwrap_or_default();

    let qualifier = if target_package.is_empty() || target_package == from_package {
        String::new()
    } else {
        format!("{}.", target_package)
    };

    format!(
        "{} {}{}#{}({})",
        SEE_TAG,
        qualifier,
        target_type,
        target.name,
        target.param_types().collect::<Vec<_>>().join(", ")
    )
}

/// Returns true if `doc` holds a back-reference to `target`.
///
/// Every `@see` tag in the doc is tested, each up to its next `)`.
pub fn references_method(model: &ProgramModel, doc: &str, target: &MethodDecl) -> bool {
    let Some(pattern) = reference_pattern(model, target) else {
        return false;
    };
    DocComment::new(doc).see_positions().into_iter().any(|start| {
        let rest = &doc[start..];
        let candidate = match rest.find(')') {
            Some(end) => &rest[..=end],
            None => rest,
        };
        pattern.is_match(candidate)
    })
}

fn reference_pattern(model: &ProgramModel, target: &MethodDecl) -> Option<Regex> {
    let owner = model.owner_of(target)?;

    let qualifier = if owner.package.is_empty() {
        String::new()
    } else {
        format!("(?:{}\\.)?", regex::escape(&owner.package))
    };
    let params = target
        .param_types()
        .map(flexible_type)
        .collect::<Vec<_>>()
        .join(r"\s*,\s*");

    let source = format!(
        r"^{}\s+{}{}#{}\(\s*{}\s*\)",
        regex::escape(SEE_TAG),
        qualifier,
        regex::escape(&owner.name),
        regex::escape(&target.name),
        params
    );
    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(err) => {
            debug!(pattern = %source, error = %err, "reference pattern rejected");
            None
        }
    }
}

/// Escape a type signature, allowing any whitespace between its characters.
fn flexible_type(ty: &str) -> String {
    ty.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| regex::escape(c.encode_utf8(&mut [0u8; 4])))
        .collect::<Vec<_>>()
        .join(r"\s*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_core::model::{MethodId, Parameter, TypeDecl, TypeId, TypeKind};

    struct Fixture {
        model: ProgramModel,
        base_f: MethodId,
        child_f: MethodId,
        other_f: MethodId,
    }

    fn fixture() -> Fixture {
        let mut model = ProgramModel::new();
        let base = model.next_type_id();
        model
            .insert_type(TypeDecl::new(base, TypeKind::Class, "p1.p2", "Simple"))
            .unwrap();
        let child = model.next_type_id();
        model
            .insert_type(
                TypeDecl::new(child, TypeKind::Class, "p1.p2", "Child").with_superclass(base),
            )
            .unwrap();
        let other = model.next_type_id();
        model
            .insert_type(TypeDecl::new(other, TypeKind::Class, "q", "Other"))
            .unwrap();

        let make = |model: &mut ProgramModel, owner: TypeId| {
            let id = model.next_method_id();
            model
                .insert_method(
                    MethodDecl::new(id, owner, "name")
                        .with_param(Parameter::new("int"))
                        .with_param(Parameter::new("long[]")),
                )
                .unwrap()
        };
        let base_f = make(&mut model, base);
        let child_f = make(&mut model, child);
        let other_f = make(&mut model, other);
        Fixture {
            model,
            base_f,
            child_f,
            other_f,
        }
    }

    mod generation {
        use super::*;

        #[test]
        fn same_package_omits_qualifier() {
            let fx = fixture();
            let from = fx.model.method(fx.child_f).unwrap();
            let target = fx.model.method(fx.base_f).unwrap();
            assert_eq!(
                reference_tag(&fx.model, from, target),
                "@see Simple#name(int, long[])"
            );
        }

        #[test]
        fn other_package_qualified() {
            let fx = fixture();
            let from = fx.model.method(fx.other_f).unwrap();
            let target = fx.model.method(fx.base_f).unwrap();
            assert_eq!(
                reference_tag(&fx.model, from, target),
                "@see p1.p2.Simple#name(int, long[])"
            );
        }
    }

    mod detection {
        use super::*;

        fn check(doc: &str) -> bool {
            let fx = fixture();
            let target = fx.model.method(fx.base_f).unwrap();
            references_method(&fx.model, doc, target)
        }

        #[test]
        fn generated_tag_detected() {
            assert!(check("/** @see Simple#name(int, long[]) */"));
            assert!(check("/** @see p1.p2.Simple#name(int, long[]) */"));
        }

        #[test]
        fn whitespace_flexible() {
            assert!(check("/**\n * @see   Simple#name( int,long [ ] )\n */"));
            assert!(check("/** @see Simple#name(int ,  long[]) */"));
        }

        #[test]
        fn wrong_target_not_detected() {
            assert!(!check("/** @see Simple#name(int) */"));
            assert!(!check("/** @see Simple#other(int, long[]) */"));
            assert!(!check("/** @see q.Simple#name(int, long[]) */"));
            assert!(!check("/** Simple#name(int, long[]) */"));
        }

        #[test]
        fn any_see_tag_counts() {
            assert!(check(
                "/**\n * Text.\n * @see Unrelated#thing()\n * @see Simple#name(int, long[])\n */"
            ));
        }

        #[test]
        fn unterminated_tag_not_detected() {
            assert!(!check("/** @see Simple#name(int, long[] */"));
        }
    }
}
