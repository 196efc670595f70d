//! Doc generation from templates and declaration structure.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use docsync_core::model::{FieldDecl, MethodDecl, ProgramModel, TypeDecl, TypeKind};
use docsync_core::text::trim_trailing_whitespace;

use super::{
    merge_text, MergeContext, Properties, Template, TemplateCategory, TemplateError,
    TemplateSource,
};
use crate::bean::{accessor_kind, property_name, AccessorKind};
use crate::doc::DocComment;

// A qualifier segment only counts when an identifier follows it, so the dots
// of a varargs suffix (`int...`) are left alone.
static PACKAGE_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:[a-z_][a-z0-9_]*\.)+([A-Za-z_])").unwrap());

/// Render a type signature without its lower-case package qualifiers.
///
/// `java.util.List<java.lang.String>` becomes `List<String>`; nested type
/// qualifiers (`Map.Entry`) and varargs suffixes are kept.
pub fn presentable_type(ty: &str) -> String {
    PACKAGE_QUALIFIER.replace_all(ty.trim(), "${1}").into_owned()
}

fn simple_name(ty: &str) -> &str {
    let ty = ty.trim();
    ty.rsplit('.').next().unwrap_or(ty)
}

/// Produces doc text for undocumented declarations.
pub struct DocGenerator<'a> {
    model: &'a ProgramModel,
    templates: &'a dyn TemplateSource,
    context: MergeContext,
}

impl<'a> DocGenerator<'a> {
    pub fn new(
        model: &'a ProgramModel,
        templates: &'a dyn TemplateSource,
        context: MergeContext,
    ) -> Self {
        DocGenerator {
            model,
            templates,
            context,
        }
    }

    /// Template category for a type.
    pub fn type_category(decl: &TypeDecl) -> TemplateCategory {
        match decl.kind {
            TypeKind::Interface => TemplateCategory::Interface,
            TypeKind::Enum => TemplateCategory::Enum,
            TypeKind::Class | TypeKind::AnonymousClass => TemplateCategory::Class,
        }
    }

    /// Template category for a method.
    pub fn method_category(decl: &MethodDecl) -> TemplateCategory {
        if decl.is_constructor {
            return TemplateCategory::Constructor;
        }
        match accessor_kind(decl) {
            Some(AccessorKind::Getter) => TemplateCategory::Getter,
            Some(AccessorKind::Setter) => TemplateCategory::Setter,
            None => TemplateCategory::PlainMethod,
        }
    }

    fn load(&self, category: TemplateCategory) -> Result<Template, TemplateError> {
        debug!(%category, "selected template");
        self.templates.load(category)
    }

    fn base_properties(&self, name: &str) -> Properties {
        let mut props = Properties::new();
        props.insert("NAME", name.to_string());
        props.insert("USER", self.context.user.clone().unwrap_or_default());
        props.insert("DATE", self.context.date.format("%Y-%m-%d").to_string());
        props
    }

    /// Doc for a class, interface, or enum.
    pub fn generate_type(&self, decl: &TypeDecl) -> Result<String, TemplateError> {
        let template = self.load(Self::type_category(decl))?;
        let mut props = self.base_properties(&decl.name);
        props.insert("PACKAGE", decl.package.clone());
        Ok(assemble(&template, &props, &[]))
    }

    /// Doc for a field.
    pub fn generate_field(&self, decl: &FieldDecl) -> Result<String, TemplateError> {
        let template = self.load(TemplateCategory::Field)?;
        let props = self.base_properties(&decl.name);
        Ok(assemble(&template, &props, &[]))
    }

    /// Doc for a method or constructor.
    ///
    /// Parameter, return, and throws lines are synthesized from the fragment
    /// templates unless the base template already carries that markup.
    pub fn generate_method(&self, decl: &MethodDecl) -> Result<String, TemplateError> {
        let category = Self::method_category(decl);
        let template = self.load(category)?;
        let markup = DocComment::new(&template.text);
        let owner = self.model.owner_of(decl);

        let mut props = self.base_properties(&decl.name);
        if let Some(owner) = owner.filter(|o| !o.is_anonymous()) {
            props.insert("CLASS", owner.name.clone());
        }

        if matches!(category, TemplateCategory::Getter | TemplateCategory::Setter) {
            if let Some(property) = property_name(decl) {
                let comment = owner
                    .and_then(|o| self.model.field_named(o.type_id, &property))
                    .and_then(|f| f.doc.as_deref())
                    .and_then(|doc| DocComment::new(doc).first_description())
                    .unwrap_or_default();
                props.insert("FIELD_NAME", property);
                props.insert("FIELD_COMMENT", comment);
            }
        }
        if category == TemplateCategory::Setter && markup.has_param_markup() {
            props.insert("PARAM", param_name(decl, 0));
        }

        let mut lines = Vec::new();

        if !decl.params.is_empty() && !markup.has_param_markup() {
            let fragment = self.load(TemplateCategory::MethodParameter)?;
            for (idx, param) in decl.params.iter().enumerate() {
                let mut fragment_props = Properties::new();
                fragment_props.insert("PARAM", param_name(decl, idx));
                fragment_props.insert("TYPE", presentable_type(&param.ty));
                lines.push(fragment.merge(&fragment_props));
            }
        }

        if let Some(return_type) = decl.return_type.as_deref() {
            let return_type = presentable_type(return_type);
            if markup.has_return_markup() {
                props.insert("RETURN_TYPE", return_type);
            } else {
                let fragment = self.load(TemplateCategory::MethodReturn)?;
                let mut fragment_props = Properties::new();
                fragment_props.insert("RETURN_TYPE", return_type);
                lines.push(fragment.merge(&fragment_props));
            }
        }

        if !decl.throws.is_empty() && !markup.has_throws_markup() {
            let fragment = self.load(TemplateCategory::MethodThrows)?;
            for throwable in &decl.throws {
                let mut fragment_props = Properties::new();
                fragment_props.insert("THROWABLE", simple_name(throwable).to_string());
                lines.push(fragment.merge(&fragment_props));
            }
        }

        Ok(assemble(&template, &props, &lines))
    }
}

fn param_name(decl: &MethodDecl, idx: usize) -> String {
    decl.params
        .get(idx)
        .and_then(|p| p.name.clone())
        .unwrap_or_else(|| format!("arg{}", idx))
}

/// Merge the template body, append synthesized lines, and close the comment.
fn assemble(template: &Template, props: &Properties, lines: &[String]) -> String {
    let body = match template.text.rfind("*/") {
        Some(end) => &template.text[..end],
        None => template.text.as_str(),
    };
    let mut out = merge_text(body.trim_end_matches([' ', '\t']), props);

    if !lines.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        if out.trim() != "/**" {
            out.push_str(" *\n");
        }
        for line in lines {
            out.push_str(" * ");
            out.push_str(line.trim());
            out.push('\n');
        }
    }
    out.push_str(" */");
    trim_trailing_whitespace(&out)
}
