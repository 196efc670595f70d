//! Bean accessor recognition.
//!
//! A getter is a parameterless, non-void method named `getX`, or `isX` when it
//! returns `boolean`/`Boolean`. A setter is a void method named `setX` taking
//! exactly one parameter. In both cases `X` must start with an uppercase
//! letter. Constructors and static methods are never accessors.

use docsync_core::model::MethodDecl;

/// Shape of a bean accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// Classify a method as a getter or setter.
pub fn accessor_kind(method: &MethodDecl) -> Option<AccessorKind> {
    if method.is_constructor || method.is_static {
        return None;
    }
    if getter_property_name(method).is_some() {
        return Some(AccessorKind::Getter);
    }
    if setter_property_name(method).is_some() {
        return Some(AccessorKind::Setter);
    }
    None
}

/// Property name of an accessor, whichever kind it is.
pub fn property_name(method: &MethodDecl) -> Option<String> {
    getter_property_name(method).or_else(|| setter_property_name(method))
}

fn getter_property_name(method: &MethodDecl) -> Option<String> {
    if !method.params.is_empty() {
        return None;
    }
    let return_type = method.return_type.as_deref()?.trim();

    if let Some(rest) = method.name.strip_prefix("get") {
        if starts_uppercase(rest) {
            return Some(decapitalize(rest));
        }
    }
    let is_boolean = matches!(return_type, "boolean" | "Boolean" | "java.lang.Boolean");
    if let Some(rest) = method.name.strip_prefix("is") {
        if is_boolean && starts_uppercase(rest) {
            return Some(decapitalize(rest));
        }
    }
    None
}

fn setter_property_name(method: &MethodDecl) -> Option<String> {
    if method.params.len() != 1 || method.return_type.is_some() {
        return None;
    }
    let rest = method.name.strip_prefix("set")?;
    starts_uppercase(rest).then(|| decapitalize(rest))
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Bean decapitalization: `Name` becomes `name`, but `URL` stays `URL`.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let second = chars.clone().next();

    if first.is_uppercase() && second.is_some_and(|c| c.is_uppercase()) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(chars.as_str());
    out
}
