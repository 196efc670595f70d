//! Test fixtures shared by unit and integration tests.
//!
//! [`Fixture::p1p2`] builds the `p1.p2` sample hierarchy: two interfaces, an
//! implementing class with an anonymous `Runnable`, a class chain rooted at
//! `java.lang.Object` with an inner helper, and an enum.
//!
//! Helpers panic with a message on bad paths. A fixture that does not
//! resolve is a broken test, not a skipped one.

use docsync_core::adapter::DocWriteBack;
use docsync_core::model::{
    DeclId, FieldDecl, MethodDecl, ModelResult, Parameter, ProgramModel, TypeDecl, TypeId,
    TypeKind, Visibility,
};

use crate::lookup::resolve_path;

const PACKAGE: &str = "p1.p2";

/// A program model plus path-based accessors.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub model: ProgramModel,
}

impl Fixture {
    /// Wrap an existing model.
    pub fn new(model: ProgramModel) -> Self {
        Fixture { model }
    }

    /// The `p1.p2` sample hierarchy.
    pub fn p1p2() -> Self {
        let mut b = Builder::default();

        // java.lang
        let object = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Class, "java.lang", "Object")
                .with_doc("/**\n * Class Object is the root of the class hierarchy.\n */")
                .read_only()
        });
        b.method(object, "toString", |m| {
            m.with_return("String").with_doc(
                "/**\n     * Returns a string representation of the object.\n     *\n     * @return a string representation of the object.\n     */",
            )
        });
        b.method(object, "hashCode", |m| {
            m.with_return("int").with_doc(
                "/**\n     * Returns a hash code value for the object.\n     *\n     * @return a hash code value for this object.\n     */",
            )
        });

        let runnable = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Interface, "java.lang", "Runnable")
                .with_doc("/**\n * A task to be run.\n */")
                .read_only()
        });
        b.method(runnable, "run", |m| {
            m.with_doc("/**\n     * Runs the task.\n     */")
        });

        // Interfaces
        let some_interface = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Interface, PACKAGE, "SomeInterface")
                .with_doc("/**\n * Interface SomeInterface\n */")
        });
        b.method(some_interface, "anAbstractMethodWithJavaDoc", |m| {
            m.with_param(Parameter::named("one", "int"))
                .with_param(Parameter::named("two", "long"))
                .with_return("String")
                .with_doc(
                    "/**\n     * Some JavaDoc here.\n     *\n     * @param one the first value\n     * @param two the second value\n     * @return a string\n     */",
                )
        });
        b.method(some_interface, "anAbstractMethodWithoutJavaDoc", |m| {
            m.with_doc("/**\n     * Method anAbstractMethodWithoutJavaDoc\n     */")
        });
        b.method(some_interface, "overrideMe", |m| {
            m.with_doc("/**\n     * Method overrideMee\n     */")
        });

        let extending_interface = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Interface, PACKAGE, "ExtendingSomeInterface")
                .with_interface(some_interface)
                .with_doc("/**\n * Interface ExtendingSomeInterface\n */")
        });
        b.method(extending_interface, "aMethodWithoutJavaDoc", |m| {
            m.with_param(Parameter::named("s", "String")).with_return("int")
        });
        b.method(extending_interface, "aMethodWithJavaDoc", |m| {
            m.with_param(Parameter::named("system", "System"))
                .with_return("byte[]")
                .with_doc(SYSTEM_DOC)
        });
        b.method(extending_interface, "aDifferentMethodWithJavaDoc", |m| {
            m.with_param(Parameter::named("objects", "List"))
                .with_return("List")
                .with_doc("/**\n     * @param objects objects\n     * @return bills\n     */")
        });
        b.method(extending_interface, "overrideMe", |m| m);

        // Implementing class and its anonymous Runnable
        let implementing = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Class, PACKAGE, "ClassImplementingInterface")
                .with_superclass(object)
                .with_interface(extending_interface)
        });
        b.field(implementing, "myMockField", "boolean", None);
        b.method(implementing, "aMethodWithoutJavaDoc", |m| {
            m.with_param(Parameter::named("s", "String")).with_return("int")
        });
        b.method(implementing, "aMethodWithJavaDoc", |m| {
            m.with_param(Parameter::named("system", "System"))
                .with_return("byte[]")
                .with_doc(SYSTEM_DOC)
        });
        b.method(implementing, "anAbstractMethodWithoutJavaDoc", |m| {
            m.with_doc("/** @see p1.p2.SomeInterface#anAbstractMethodWithoutJavaDoc() */")
        });
        b.method(implementing, "anAbstractMethodWithJavaDoc", |m| {
            m.with_param(Parameter::named("one", "int"))
                .with_param(Parameter::named("two", "long"))
                .with_return("String")
                .with_doc(DIFFERENT_ABSTRACT_DOC)
        });
        b.method(implementing, "aDifferentMethodWithJavaDoc", |m| {
            m.with_param(Parameter::named("objects", "List"))
                .with_return("List")
        });
        b.method(implementing, "overrideMe", |m| {
            m.with_doc("/**\n     * Method overrideMe\n     */")
        });

        let anonymous = b.ty(|id| {
            TypeDecl::new(
                id,
                TypeKind::AnonymousClass,
                PACKAGE,
                "ClassImplementingInterface$1",
            )
            .with_superclass(object)
            .with_base(runnable)
            .with_outer(implementing)
        });
        b.method(anonymous, "toString", |m| m.with_return("String"));
        b.method(anonymous, "run", |m| m);

        // Class chain
        let extending_object = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Class, PACKAGE, "ClassExtendingObject")
                .with_superclass(object)
        });
        b.constructor(extending_object, "ClassExtendingObject", |m| m);
        b.constructor(extending_object, "ClassExtendingObject", |m| {
            m.with_param(Parameter::named("x", "String")).with_doc(
                "/**\n     * Constructor ClassExtendingObject\n     *\n     * @param x the name\n     */",
            )
        });
        b.method(extending_object, "methodWithoutJavaDoc", |m| m);
        b.method(extending_object, "methodWithJavaDoc", |m| {
            m.with_doc("/**\n     * Method methodWithJavaDoc\n     */")
        });
        b.method(extending_object, "toString", |m| {
            m.with_return("String").with_doc(
                "/**\n     * Method overridden from Object class\n     * @return the string\n     */",
            )
        });

        let helper = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Class, PACKAGE, "ClassExtendingObject.Helper")
                .with_superclass(object)
                .with_outer(extending_object)
        });
        b.method(helper, "assist", |m| m);

        let extending_custom = b.ty(|id| {
            TypeDecl::new(id, TypeKind::Class, PACKAGE, "ClassExtendingCustomClass")
                .with_superclass(extending_object)
        });
        b.constructor(extending_custom, "ClassExtendingCustomClass", |m| {
            m.with_doc("/**\n     * Constructor ClassExtendingCustomClass\n     */")
        });
        b.constructor(extending_custom, "ClassExtendingCustomClass", |m| {
            m.with_param(Parameter::named("xy", "String")).with_doc(
                "/**\n     * Constructor ClassExtendingCustomClass\n     *\n     * @param xy the name\n     */",
            )
        });
        b.method(extending_custom, "methodWithoutJavaDoc", |m| {
            m.with_doc("/**\n     * Method methodWithoutJavaDoc\n     *\n     */")
        });
        b.method(extending_custom, "hashCode", |m| {
            m.with_return("int")
                .with_doc("/**\n     * Method hashCode\n     *\n     * @return the hash\n     */")
        });
        b.method(extending_custom, "toString", |m| {
            m.with_return("String").with_doc(
                "/**\n     * Different JavaDoc here.\n     * @return the string\n     */",
            )
        });

        // Enum
        let color = b.ty(|id| TypeDecl::new(id, TypeKind::Enum, PACKAGE, "ColorEnum"));
        for name in ["r", "g", "b"] {
            b.field(color, name, "int", None);
        }
        b.constructor(color, "ColorEnum", |m| {
            m.with_param(Parameter::named("r", "int"))
                .with_param(Parameter::named("g", "int"))
                .with_param(Parameter::named("b", "int"))
                .with_visibility(Visibility::Private)
                .with_doc("/**\n     * Constructor ColorEnum\n     */")
        });
        for (getter, field) in [("getR", "r"), ("getG", "g"), ("getB", "b")] {
            let doc = format!(
                "/**\n     * Method {getter} returns the {field} component.\n     *\n     * @return the {field} component\n     */"
            );
            b.method(color, getter, |m| m.with_return("int").with_doc(doc));
        }

        Fixture { model: b.model }
    }

    /// Resolve a declaration path, panicking if it does not resolve.
    pub fn decl(&self, path: &str) -> DeclId {
        resolve_path(&self.model, path)
            .unwrap_or_else(|err| panic!("fixture path '{path}' does not resolve: {err}"))
    }

    /// The method at `path`.
    pub fn method(&self, path: &str) -> &MethodDecl {
        match self.decl(path) {
            DeclId::Method(id) => self
                .model
                .method(id)
                .unwrap_or_else(|| panic!("fixture method '{path}' missing")),
            other => panic!("fixture path '{path}' is not a method: {other}"),
        }
    }

    /// Current doc at `path`.
    pub fn doc(&self, path: &str) -> Option<&str> {
        self.model.doc(self.decl(path))
    }

    /// Replace the doc at `path`. The declaration must be writable.
    pub fn set_doc(&mut self, path: &str, doc: &str) {
        let decl = self.decl(path);
        self.model
            .set_doc(decl, doc.to_string())
            .unwrap_or_else(|err| panic!("cannot set doc of '{path}': {err}"));
    }

    /// Mark the file of the type at `path` writable or read-only.
    pub fn set_writable(&mut self, path: &str, writable: bool) {
        let DeclId::Type(id) = self.decl(path) else {
            panic!("fixture path '{path}' is not a type");
        };
        built(self.model.set_writable(id, writable));
    }

    /// Change the visibility of the method at `path`.
    pub fn set_visibility(&mut self, path: &str, visibility: Visibility) {
        let DeclId::Method(id) = self.decl(path) else {
            panic!("fixture path '{path}' is not a method");
        };
        match self.model.method_mut(id) {
            Some(method) => method.visibility = visibility,
            None => panic!("fixture method '{path}' missing"),
        }
    }
}

const SYSTEM_DOC: &str =
    "/**\n     * Method aMethodWithJavaDoc\n     *\n     * @param system the system\n     * @return the bytes\n     */";

const DIFFERENT_ABSTRACT_DOC: &str = "/**
     * Some different JavaDoc here.
     *
     * @param one the first value
     * @param two the second value
     * @return a string
     *
     * @see ExtendingSomeInterface
     */";

fn built<T>(result: ModelResult<T>) -> T {
    result.unwrap_or_else(|err| panic!("fixture model is inconsistent: {err}"))
}

#[derive(Default)]
struct Builder {
    model: ProgramModel,
}

impl Builder {
    fn ty(&mut self, decl: impl FnOnce(TypeId) -> TypeDecl) -> TypeId {
        let id = self.model.next_type_id();
        built(self.model.insert_type(decl(id)))
    }

    fn method(
        &mut self,
        owner: TypeId,
        name: &str,
        build: impl FnOnce(MethodDecl) -> MethodDecl,
    ) {
        let id = self.model.next_method_id();
        built(self.model.insert_method(build(MethodDecl::new(id, owner, name))));
    }

    fn constructor(
        &mut self,
        owner: TypeId,
        name: &str,
        build: impl FnOnce(MethodDecl) -> MethodDecl,
    ) {
        let id = self.model.next_method_id();
        built(
            self.model
                .insert_method(build(MethodDecl::constructor(id, owner, name))),
        );
    }

    fn field(&mut self, owner: TypeId, name: &str, ty: &str, doc: Option<&str>) {
        let id = self.model.next_field_id();
        let mut decl = FieldDecl::new(id, owner, name).with_type(ty);
        decl.doc = doc.map(str::to_string);
        built(self.model.insert_field(decl));
    }
}
