//! Doc comment facts and comparison.
//!
//! Two docs are equal when they match line by line after leading and trailing
//! whitespace is stripped from every line. This ignores re-indentation (a doc
//! copied into a nested class) but not rewording or reflowed text.

use docsync_core::model::MethodDecl;
use docsync_core::text::{newline_count, normalize_line_endings, trim_each_line};

/// Tag marking a doc whose content is inherited from the super-member.
pub const INHERIT_DOC_TAG: &str = "@inheritDoc";

/// Back-reference block tag.
pub const SEE_TAG: &str = "@see";

/// Normalize a doc for comparison.
pub fn normalize(doc: &str) -> String {
    trim_each_line(doc)
}

/// Compare two docs under [`normalize`].
pub fn docs_equal(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Returns true if the raw doc text contains the inherit marker.
pub fn declares_inherit_tag(doc: &str) -> bool {
    doc.contains(INHERIT_DOC_TAG)
}

/// Returns true if `method` inherits a usable doc from `super_method`.
///
/// Static methods never inherit docs. The super-member must carry a
/// non-empty doc for the marker to mean anything.
pub fn is_effectively_inherited(method: &MethodDecl, super_method: Option<&MethodDecl>) -> bool {
    if method.is_static {
        return false;
    }
    let Some(super_method) = super_method else {
        return false;
    };
    let declares = method.doc.as_deref().is_some_and(declares_inherit_tag);
    let super_has_doc = super_method
        .doc
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    declares && super_has_doc
}

/// Borrowed view of a raw doc comment with derived facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocComment<'a> {
    raw: &'a str,
}

impl<'a> DocComment<'a> {
    pub fn new(raw: &'a str) -> Self {
        DocComment { raw }
    }

    /// Raw text, delimiters included.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn declares_inherit_tag(&self) -> bool {
        declares_inherit_tag(self.raw)
    }

    /// Byte offsets of every `@see` tag.
    pub fn see_positions(&self) -> Vec<usize> {
        self.raw.match_indices(SEE_TAG).map(|(idx, _)| idx).collect()
    }

    pub fn has_see(&self) -> bool {
        self.raw.contains(SEE_TAG)
    }

    pub fn has_param_markup(&self) -> bool {
        self.raw.contains("@param")
    }

    pub fn has_return_markup(&self) -> bool {
        self.raw.contains("@return")
    }

    /// `@throws` or its older spelling `@exception`.
    pub fn has_throws_markup(&self) -> bool {
        self.raw.contains("@throws") || self.raw.contains("@exception")
    }

    /// The doc fits on one line.
    pub fn is_single_line(&self) -> bool {
        newline_count(self.raw.trim_end()) == 0
    }

    /// First line of descriptive text, before any block tag.
    ///
    /// Comment delimiters and leading `*` decoration are removed.
    pub fn first_description(&self) -> Option<String> {
        let text = normalize_line_endings(self.raw);
        let body = text.trim();
        let body = body.strip_prefix("/**").unwrap_or(body);
        let body = body.strip_suffix("*/").unwrap_or(body);

        for line in body.split('\n') {
            let line = line.trim().trim_start_matches('*').trim();
            if line.starts_with('@') {
                return None;
            }
            if !line.is_empty() {
                return Some(line.to_string());
            }
        }
        None
    }
}
