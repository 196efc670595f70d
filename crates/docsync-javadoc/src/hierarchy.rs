//! Super-member resolution across class and interface lineages.
//!
//! # Algorithm
//!
//! Given a method, the resolver looks for the nearest ancestor member with the
//! same signature (name and parameter types; parameter types alone for
//! constructors):
//!
//! 1. **Class chain.** Walk the superclass chain from the owning type upward.
//!    At each ancestor, search the ancestor's own members. Because the walk
//!    continues upward, members an ancestor inherits are found at the level
//!    that declares them.
//! 2. **Interface lineage.** Only if the class chain found nothing, search
//!    interfaces depth-first: each interface's own members, then the
//!    interfaces it extends, before moving on to the next sibling.
//!
//! The first match wins. There is no "most specific" tie-break.
//!
//! # Interface Scope
//!
//! [`InterfaceSearchScope`] decides which interface lists phase 2 starts from:
//!
//! - `DeclaringType`: only the owning type's interfaces.
//! - `EachAncestor`: the owning type's interfaces, then each superclass's
//!   interfaces in chain order.
//!
//! With `DeclaringType`, a method whose only super-member sits on an interface
//! implemented by a superclass resolves to nothing.
//!
//! # Cycles
//!
//! Every walk keeps a visited set, so a cyclic (malformed) hierarchy
//! terminates.

use std::collections::HashSet;

use tracing::{debug, trace};

use docsync_core::config::InterfaceSearchScope;
use docsync_core::model::{MethodDecl, ProgramModel, TypeId};

/// Resolves super-members within one [`ProgramModel`].
#[derive(Debug, Clone, Copy)]
pub struct HierarchyResolver<'a> {
    model: &'a ProgramModel,
    scope: InterfaceSearchScope,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(model: &'a ProgramModel, scope: InterfaceSearchScope) -> Self {
        HierarchyResolver { model, scope }
    }

    pub fn model(&self) -> &'a ProgramModel {
        self.model
    }

    /// Nearest super-member of `method`, if any.
    pub fn resolve_super(&self, method: &MethodDecl) -> Option<&'a MethodDecl> {
        let owner = self.model.type_decl(method.owner)?;

        let chain = self.superclass_chain(owner.type_id);
        for &ancestor in &chain {
            if let Some(found) = self.find_own(ancestor, method) {
                debug!(
                    method = %method.method_id,
                    found = %found.method_id,
                    "super member found in class chain"
                );
                return Some(found);
            }
        }

        let mut roots: Vec<TypeId> = owner.interfaces.clone();
        if self.scope == InterfaceSearchScope::EachAncestor {
            for &ancestor in &chain {
                if let Some(ty) = self.model.type_decl(ancestor) {
                    roots.extend(ty.interfaces.iter().copied());
                }
            }
        }

        let mut visited = HashSet::new();
        let found = roots
            .into_iter()
            .find_map(|iface| self.search_interface(iface, method, &mut visited));
        if let Some(found) = found {
            debug!(
                method = %method.method_id,
                found = %found.method_id,
                "super member found in interface lineage"
            );
        }
        found
    }

    /// Matching member declared by the base type of an anonymous class.
    ///
    /// Only the base type's own members are considered.
    pub fn resolve_virtual_super(&self, method: &MethodDecl) -> Option<&'a MethodDecl> {
        let owner = self.model.type_decl(method.owner)?;
        if !owner.is_anonymous() {
            return None;
        }
        let base = owner.base?;
        self.find_own(base, method)
    }

    /// Returns true if the method is declared by the hierarchy root.
    pub fn is_from_root(&self, method: &MethodDecl) -> bool {
        self.model.is_root_type(method.owner)
    }

    /// Superclasses of `start`, nearest first, excluding `start`.
    pub fn superclass_chain(&self, start: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut current = self.model.type_decl(start).and_then(|t| t.superclass);
        while let Some(id) = current {
            if !visited.insert(id) {
                trace!(type_id = %id, "superclass cycle, stopping");
                break;
            }
            chain.push(id);
            current = self.model.type_decl(id).and_then(|t| t.superclass);
        }
        chain
    }

    fn search_interface(
        &self,
        iface: TypeId,
        method: &MethodDecl,
        visited: &mut HashSet<TypeId>,
    ) -> Option<&'a MethodDecl> {
        if !visited.insert(iface) {
            return None;
        }
        if let Some(found) = self.find_own(iface, method) {
            return Some(found);
        }
        let extended = self.model.type_decl(iface)?.interfaces.clone();
        extended
            .into_iter()
            .find_map(|parent| self.search_interface(parent, method, visited))
    }

    fn find_own(&self, ty: TypeId, method: &MethodDecl) -> Option<&'a MethodDecl> {
        self.model
            .methods_of(ty)
            .find(|candidate| {
                candidate.method_id != method.method_id && candidate.matches_signature(method)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_core::model::{MethodId, Parameter, TypeDecl, TypeKind};

    struct Builder {
        model: ProgramModel,
    }

    impl Builder {
        fn new() -> Self {
            Builder {
                model: ProgramModel::new(),
            }
        }

        fn ty(&mut self, kind: TypeKind, name: &str) -> TypeId {
            let id = self.model.next_type_id();
            self.model
                .insert_type(TypeDecl::new(id, kind, "p", name))
                .unwrap()
        }

        fn extends(&mut self, child: TypeId, parent: TypeId) {
            self.model.set_superclass(child, parent).unwrap();
        }

        fn implements(&mut self, child: TypeId, iface: TypeId) {
            self.model.add_interface(child, iface).unwrap();
        }

        fn method(&mut self, owner: TypeId, name: &str, params: &[&str]) -> MethodId {
            let id = self.model.next_method_id();
            let mut m = MethodDecl::new(id, owner, name);
            for p in params {
                m = m.with_param(Parameter::new(*p));
            }
            self.model.insert_method(m).unwrap()
        }

        fn ctor(&mut self, owner: TypeId, params: &[&str]) -> MethodId {
            let id = self.model.next_method_id();
            let name = self.model.type_decl(owner).unwrap().name.clone();
            let mut m = MethodDecl::constructor(id, owner, name);
            for p in params {
                m = m.with_param(Parameter::new(*p));
            }
            self.model.insert_method(m).unwrap()
        }

        fn resolve(&self, method: MethodId, scope: InterfaceSearchScope) -> Option<MethodId> {
            let resolver = HierarchyResolver::new(&self.model, scope);
            let m = self.model.method(method).unwrap();
            resolver.resolve_super(m).map(|s| s.method_id)
        }
    }

    const EACH: InterfaceSearchScope = InterfaceSearchScope::EachAncestor;
    const DECLARING: InterfaceSearchScope = InterfaceSearchScope::DeclaringType;

    mod class_chain {
        use super::*;

        #[test]
        fn direct_override() {
            let mut b = Builder::new();
            let base = b.ty(TypeKind::Class, "Base");
            let child = b.ty(TypeKind::Class, "Child");
            b.extends(child, base);
            let base_f = b.method(base, "f", &[]);
            let child_f = b.method(child, "f", &[]);

            assert_eq!(b.resolve(child_f, EACH), Some(base_f));
            assert_eq!(b.resolve(base_f, EACH), None);
        }

        #[test]
        fn inherited_member_found_up_the_chain() {
            let mut b = Builder::new();
            let a = b.ty(TypeKind::Class, "A");
            let mid = b.ty(TypeKind::Class, "Mid");
            let c = b.ty(TypeKind::Class, "C");
            b.extends(mid, a);
            b.extends(c, mid);
            let a_f = b.method(a, "f", &["int"]);
            let c_f = b.method(c, "f", &["int"]);

            assert_eq!(b.resolve(c_f, EACH), Some(a_f));
        }

        #[test]
        fn nearest_ancestor_wins() {
            let mut b = Builder::new();
            let a = b.ty(TypeKind::Class, "A");
            let mid = b.ty(TypeKind::Class, "Mid");
            let c = b.ty(TypeKind::Class, "C");
            b.extends(mid, a);
            b.extends(c, mid);
            b.method(a, "f", &[]);
            let mid_f = b.method(mid, "f", &[]);
            let c_f = b.method(c, "f", &[]);

            assert_eq!(b.resolve(c_f, EACH), Some(mid_f));
        }

        #[test]
        fn overloads_do_not_match() {
            let mut b = Builder::new();
            let base = b.ty(TypeKind::Class, "Base");
            let child = b.ty(TypeKind::Class, "Child");
            b.extends(child, base);
            b.method(base, "f", &["int"]);
            let child_f = b.method(child, "f", &["long"]);

            assert_eq!(b.resolve(child_f, EACH), None);
        }

        #[test]
        fn class_chain_beats_interfaces() {
            let mut b = Builder::new();
            let base = b.ty(TypeKind::Class, "Base");
            let iface = b.ty(TypeKind::Interface, "I");
            let child = b.ty(TypeKind::Class, "Child");
            b.extends(child, base);
            b.implements(child, iface);
            b.method(iface, "f", &[]);
            let base_f = b.method(base, "f", &[]);
            let child_f = b.method(child, "f", &[]);

            assert_eq!(b.resolve(child_f, EACH), Some(base_f));
        }

        #[test]
        fn constructors_match_by_params_only() {
            let mut b = Builder::new();
            let base = b.ty(TypeKind::Class, "Base");
            let child = b.ty(TypeKind::Class, "Child");
            b.extends(child, base);
            b.method(base, "Child", &["int"]);
            let base_ctor = b.ctor(base, &["int"]);
            let child_ctor = b.ctor(child, &["int"]);
            let child_other = b.ctor(child, &["String"]);

            assert_eq!(b.resolve(child_ctor, EACH), Some(base_ctor));
            assert_eq!(b.resolve(child_other, EACH), None);
        }

        #[test]
        fn cyclic_hierarchy_terminates() {
            let mut b = Builder::new();
            let a = b.ty(TypeKind::Class, "A");
            let c = b.ty(TypeKind::Class, "C");
            b.extends(a, c);
            b.extends(c, a);
            let a_f = b.method(a, "f", &[]);

            assert_eq!(b.resolve(a_f, EACH), None);
        }
    }

    mod interfaces {
        use super::*;

        #[test]
        fn implemented_interface() {
            let mut b = Builder::new();
            let iface = b.ty(TypeKind::Interface, "I");
            let c = b.ty(TypeKind::Class, "C");
            b.implements(c, iface);
            let i_g = b.method(iface, "g", &["int"]);
            let c_g = b.method(c, "g", &["int"]);

            assert_eq!(b.resolve(c_g, EACH), Some(i_g));
            assert_eq!(b.resolve(c_g, DECLARING), Some(i_g));
        }

        #[test]
        fn extended_interfaces_depth_first() {
            let mut b = Builder::new();
            let top = b.ty(TypeKind::Interface, "Top");
            let left = b.ty(TypeKind::Interface, "Left");
            let right = b.ty(TypeKind::Interface, "Right");
            let c = b.ty(TypeKind::Class, "C");
            b.implements(left, top);
            b.implements(c, left);
            b.implements(c, right);
            let top_g = b.method(top, "g", &[]);
            b.method(right, "g", &[]);
            let c_g = b.method(c, "g", &[]);

            assert_eq!(b.resolve(c_g, EACH), Some(top_g));
        }

        #[test]
        fn interface_method_resolves_to_extended_interface() {
            let mut b = Builder::new();
            let parent = b.ty(TypeKind::Interface, "SomeInterface");
            let child = b.ty(TypeKind::Interface, "ExtendingSomeInterface");
            b.implements(child, parent);
            let parent_m = b.method(parent, "method", &[]);
            let child_m = b.method(child, "method", &[]);

            assert_eq!(b.resolve(child_m, EACH), Some(parent_m));
        }

        #[test]
        fn diamond_interfaces_visited_once() {
            let mut b = Builder::new();
            let top = b.ty(TypeKind::Interface, "Top");
            let left = b.ty(TypeKind::Interface, "Left");
            let right = b.ty(TypeKind::Interface, "Right");
            let c = b.ty(TypeKind::Class, "C");
            b.implements(left, top);
            b.implements(right, top);
            b.implements(top, left);
            b.implements(c, left);
            b.implements(c, right);
            let c_g = b.method(c, "g", &[]);

            assert_eq!(b.resolve(c_g, EACH), None);
        }
    }

    mod scope {
        use super::*;

        /// `Child extends Base`, `Base implements I`, only `I` declares `f`.
        fn inherited_interface() -> (Builder, MethodId, MethodId) {
            let mut b = Builder::new();
            let iface = b.ty(TypeKind::Interface, "I");
            let base = b.ty(TypeKind::Class, "Base");
            let child = b.ty(TypeKind::Class, "Child");
            b.implements(base, iface);
            b.extends(child, base);
            let i_f = b.method(iface, "f", &[]);
            let child_f = b.method(child, "f", &[]);
            (b, i_f, child_f)
        }

        #[test]
        fn each_ancestor_finds_superclass_interfaces() {
            let (b, i_f, child_f) = inherited_interface();
            assert_eq!(b.resolve(child_f, EACH), Some(i_f));
        }

        #[test]
        fn declaring_type_ignores_superclass_interfaces() {
            let (b, _, child_f) = inherited_interface();
            assert_eq!(b.resolve(child_f, DECLARING), None);
        }

        #[test]
        fn declaring_type_interfaces_searched_before_ancestor_interfaces() {
            let (mut b, _, child_f) = inherited_interface();
            let own = b.ty(TypeKind::Interface, "Own");
            let child = b.model.method(child_f).unwrap().owner;
            b.implements(child, own);
            let own_f = b.method(own, "f", &[]);

            assert_eq!(b.resolve(child_f, EACH), Some(own_f));
        }
    }

    mod virtual_super {
        use super::*;

        #[test]
        fn anonymous_base_member() {
            let mut b = Builder::new();
            let iface = b.ty(TypeKind::Interface, "Runnable");
            let anon = b.ty(TypeKind::AnonymousClass, "Outer$1");
            b.model.set_base(anon, iface).unwrap();
            let run = b.method(iface, "run", &[]);
            let anon_run = b.method(anon, "run", &[]);

            let resolver = HierarchyResolver::new(&b.model, EACH);
            let m = b.model.method(anon_run).unwrap();
            assert!(resolver.resolve_super(m).is_none());
            assert_eq!(resolver.resolve_virtual_super(m).map(|s| s.method_id), Some(run));
        }

        #[test]
        fn named_class_has_no_virtual_super() {
            let mut b = Builder::new();
            let c = b.ty(TypeKind::Class, "C");
            let f = b.method(c, "f", &[]);
            let resolver = HierarchyResolver::new(&b.model, EACH);
            assert!(resolver
                .resolve_virtual_super(b.model.method(f).unwrap())
                .is_none());
        }
    }

    mod root {
        use super::*;

        #[test]
        fn object_methods_are_root() {
            let mut model = ProgramModel::new();
            let id = model.next_type_id();
            let object = model
                .insert_type(TypeDecl::new(id, TypeKind::Class, "java.lang", "Object"))
                .unwrap();
            let m = model.next_method_id();
            model
                .insert_method(MethodDecl::new(m, object, "toString").with_return("String"))
                .unwrap();

            let resolver = HierarchyResolver::new(&model, EACH);
            assert!(resolver.is_from_root(model.method(m).unwrap()));
        }
    }
}
