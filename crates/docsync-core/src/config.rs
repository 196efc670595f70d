//! Analysis configuration.
//!
//! [`AnalysisConfig`] is an immutable value passed into every analysis and fix
//! entry point. It can be built in code with the `with_*` methods or loaded
//! from a JSON file in which every field is optional:
//!
//! ```json
//! {
//!   "method_detection_level": "protected",
//!   "check_inner_classes": true,
//!   "check_anonymous_classes": false,
//!   "single_line_references": true,
//!   "interface_scope": "each_ancestor"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::Visibility;

/// Which interfaces the super-member search visits after the class chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceSearchScope {
    /// Only the interface lineage of the method's declaring type.
    DeclaringType,
    /// The declaring type's interfaces, then each superclass's interfaces,
    /// nearest superclass first.
    #[default]
    EachAncestor,
}

/// Options controlling which declarations are checked and how fixes format text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Least visible method access level that is still checked.
    pub method_detection_level: Visibility,
    /// Check nested (inner) types and their members.
    pub check_inner_classes: bool,
    /// Check anonymous classes and their members.
    pub check_anonymous_classes: bool,
    /// Format generated `@see` references as single-line docs.
    pub single_line_references: bool,
    /// Interface search scope for super-member resolution.
    pub interface_scope: InterfaceSearchScope,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            method_detection_level: Visibility::Private,
            check_inner_classes: true,
            check_anonymous_classes: true,
            single_line_references: true,
            interface_scope: InterfaceSearchScope::default(),
        }
    }
}

impl AnalysisConfig {
    /// Set the method detection level.
    pub fn with_method_detection_level(mut self, level: Visibility) -> Self {
        self.method_detection_level = level;
        self
    }

    /// Enable or disable checking of inner classes.
    pub fn with_inner_classes(mut self, enabled: bool) -> Self {
        self.check_inner_classes = enabled;
        self
    }

    /// Enable or disable checking of anonymous classes.
    pub fn with_anonymous_classes(mut self, enabled: bool) -> Self {
        self.check_anonymous_classes = enabled;
        self
    }

    /// Choose single-line or multi-line reference formatting.
    pub fn with_single_line_references(mut self, enabled: bool) -> Self {
        self.single_line_references = enabled;
        self
    }

    /// Set the interface search scope.
    pub fn with_interface_scope(mut self, scope: InterfaceSearchScope) -> Self {
        self.interface_scope = scope;
        self
    }

    /// Returns true if a method with this visibility is checked.
    pub fn admits(&self, visibility: Visibility) -> bool {
        visibility.within(self.method_detection_level)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors loading an [`AnalysisConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_check_everything() {
        let config = AnalysisConfig::default();
        assert!(config.admits(Visibility::Private));
        assert!(config.check_inner_classes);
        assert!(config.check_anonymous_classes);
        assert!(config.single_line_references);
        assert_eq!(config.interface_scope, InterfaceSearchScope::EachAncestor);
    }

    #[test]
    fn detection_level_filters() {
        let config = AnalysisConfig::default().with_method_detection_level(Visibility::Protected);
        assert!(config.admits(Visibility::Public));
        assert!(config.admits(Visibility::Protected));
        assert!(!config.admits(Visibility::Default));
        assert!(!config.admits(Visibility::Private));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "check_anonymous_classes": false }"#).unwrap();
        assert!(!config.check_anonymous_classes);
        assert!(config.check_inner_classes);
        assert_eq!(config.method_detection_level, Visibility::Private);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "method_detection_level": "public", "interface_scope": "declaring_type" }}"#
        )
        .unwrap();

        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.method_detection_level, Visibility::Public);
        assert_eq!(config.interface_scope, InterfaceSearchScope::DeclaringType);
    }

    #[test]
    fn load_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = AnalysisConfig::from_json_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = AnalysisConfig::from_json_file(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
