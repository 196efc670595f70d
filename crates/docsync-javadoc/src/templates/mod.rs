//! Doc templates: categories, sources, and placeholder merging.
//!
//! A template is doc comment text with `${NAME}` placeholders. Eight
//! categories produce whole docs (one per declaration shape); three are
//! fragments the generator appends to method docs for parameters, return
//! values, and declared throwables.
//!
//! Templates come from a [`TemplateSource`]. [`BuiltinTemplates`] carries the
//! default text for every category; [`OverlayTemplates`] layers caller
//! overrides, typically read from a directory of `<category>.tpl` files.

mod builtin;
mod generator;

pub use builtin::BuiltinTemplates;
pub use generator::{presentable_type, DocGenerator};

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File extension of template override files.
pub const TEMPLATE_EXTENSION: &str = "tpl";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

// ============================================================================
// Categories
// ============================================================================

/// Which template a declaration (or doc fragment) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    Class,
    Interface,
    Enum,
    Field,
    Constructor,
    Getter,
    Setter,
    PlainMethod,
    MethodParameter,
    MethodReturn,
    MethodThrows,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 11] = [
        TemplateCategory::Class,
        TemplateCategory::Interface,
        TemplateCategory::Enum,
        TemplateCategory::Field,
        TemplateCategory::Constructor,
        TemplateCategory::Getter,
        TemplateCategory::Setter,
        TemplateCategory::PlainMethod,
        TemplateCategory::MethodParameter,
        TemplateCategory::MethodReturn,
        TemplateCategory::MethodThrows,
    ];

    /// File stem used for override files (`getter.tpl`, `plain-method.tpl`).
    pub fn file_stem(&self) -> &'static str {
        match self {
            TemplateCategory::Class => "class",
            TemplateCategory::Interface => "interface",
            TemplateCategory::Enum => "enum",
            TemplateCategory::Field => "field",
            TemplateCategory::Constructor => "constructor",
            TemplateCategory::Getter => "getter",
            TemplateCategory::Setter => "setter",
            TemplateCategory::PlainMethod => "plain-method",
            TemplateCategory::MethodParameter => "method-parameter",
            TemplateCategory::MethodReturn => "method-return",
            TemplateCategory::MethodThrows => "method-throws",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateCategory::Class => "Class",
            TemplateCategory::Interface => "Interface",
            TemplateCategory::Enum => "Enum",
            TemplateCategory::Field => "Field",
            TemplateCategory::Constructor => "Constructor",
            TemplateCategory::Getter => "Getter method",
            TemplateCategory::Setter => "Setter method",
            TemplateCategory::PlainMethod => "Plain method",
            TemplateCategory::MethodParameter => "Method parameter",
            TemplateCategory::MethodReturn => "Method return type",
            TemplateCategory::MethodThrows => "Method throws clause",
        }
    }

    /// Fragment categories are merged into a method doc, never used alone.
    pub fn is_fragment(&self) -> bool {
        matches!(
            self,
            TemplateCategory::MethodParameter
                | TemplateCategory::MethodReturn
                | TemplateCategory::MethodThrows
        )
    }

    pub fn from_file_stem(stem: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.file_stem() == stem)
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Template text with `${NAME}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Template { text: text.into() }
    }

    /// Placeholder names used by this template, sorted and deduplicated.
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER
            .captures_iter(&self.text)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Substitute every placeholder. Unknown placeholders become empty.
    pub fn merge(&self, properties: &Properties) -> String {
        merge_text(&self.text, properties)
    }
}

/// Placeholder values for a merge.
pub type Properties = HashMap<&'static str, String>;

pub(crate) fn merge_text(text: &str, properties: &Properties) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            properties.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Values that come from the environment rather than the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeContext {
    /// `${USER}`; empty when unset.
    pub user: Option<String>,
    /// `${DATE}`, rendered as an ISO date.
    pub date: NaiveDate,
}

impl MergeContext {
    pub fn new(user: Option<String>, date: NaiveDate) -> Self {
        MergeContext { user, date }
    }

    /// Today's local date and the `USER` (or `USERNAME`) environment variable.
    pub fn now() -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .filter(|u| !u.is_empty());
        MergeContext {
            user,
            date: chrono::Local::now().date_naive(),
        }
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Errors from loading templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The source has no template for this category.
    #[error("no template available for category '{category}'")]
    Unavailable { category: TemplateCategory },

    /// A template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where templates come from.
pub trait TemplateSource: Send + Sync {
    /// Load the template for a category.
    fn load(&self, category: TemplateCategory) -> Result<Template, TemplateError>;

    /// Description of a category for display. Never rendered into docs.
    fn describe(&self, category: TemplateCategory) -> Option<&str>;

    /// Returns true if [`load`](Self::load) would succeed.
    fn has(&self, category: TemplateCategory) -> bool {
        self.load(category).is_ok()
    }
}

/// Caller overrides layered over the built-in templates.
#[derive(Debug, Clone, Default)]
pub struct OverlayTemplates {
    base: BuiltinTemplates,
    overrides: BTreeMap<TemplateCategory, Template>,
}

impl OverlayTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, category: TemplateCategory, template: Template) -> Self {
        self.overrides.insert(category, template);
        self
    }

    pub fn overrides(&self) -> impl Iterator<Item = TemplateCategory> + '_ {
        self.overrides.keys().copied()
    }

    /// Read every `<category>.tpl` file in `dir`.
    ///
    /// Files whose stem names no category are ignored. A missing category
    /// file keeps the built-in text.
    pub fn from_dir(dir: &Path) -> Result<Self, TemplateError> {
        let entries = std::fs::read_dir(dir).map_err(|source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut overlay = OverlayTemplates::new();
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(category) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(TemplateCategory::from_file_stem)
            else {
                debug!(path = %path.display(), "ignoring unrecognized template file");
                continue;
            };
            let text = std::fs::read_to_string(&path).map_err(|source| TemplateError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(%category, path = %path.display(), "loaded template override");
            overlay
                .overrides
                .insert(category, Template::new(text.trim_end().to_string()));
        }
        Ok(overlay)
    }
}

impl TemplateSource for OverlayTemplates {
    fn load(&self, category: TemplateCategory) -> Result<Template, TemplateError> {
        match self.overrides.get(&category) {
            Some(template) => Ok(template.clone()),
            None => self.base.load(category),
        }
    }

    fn describe(&self, category: TemplateCategory) -> Option<&str> {
        self.base.describe(category)
    }
}

// ============================================================================
// Tests
// ============================================================================
