//! CLI front door.
//!
//! Helpers behind the `docsync` binary:
//! - `check` - run every diagnostic over a model snapshot
//! - `fix` - compute (and optionally write back) one offered fix
//!
//! ## Snapshots
//!
//! The model is read from a JSON [`ModelBundle`]. `fix --write` applies the
//! computed plan to the in-memory model and writes the updated bundle to a
//! new file; the input snapshot is never modified.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, DocSyncError>`. Domain errors (lookup,
//! fix, template, config) convert through their `From` bridges so the caller
//! only has to render one error type.

use std::path::Path;

use tracing::{debug, info};

use docsync_core::adapter::ModelBundle;
use docsync_core::config::{AnalysisConfig, InterfaceSearchScope};
use docsync_core::error::DocSyncError;
use docsync_core::model::{DeclId, ProgramModel, Visibility};
use docsync_core::output::{CheckResponse, CheckSummary, EditInfo, FailureInfo, FixResponse};
use docsync_core::patch::{ApplyMode, EditMode, EditPlan, MemberFailure};
use docsync_javadoc::inspect::{Analyzer, FixKind};
use docsync_javadoc::lookup::resolve_path;
use docsync_javadoc::ops::{compute_fix, offered_fix, FixContext};
use docsync_javadoc::templates::{MergeContext, OverlayTemplates, TemplateSource};

// ============================================================================
// Inputs
// ============================================================================

/// Read a model snapshot from a JSON file.
pub fn load_model(path: &Path) -> Result<ProgramModel, DocSyncError> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DocSyncError::file_not_found(path.display().to_string())
        } else {
            DocSyncError::internal(format!("cannot read {}: {}", path.display(), err))
        }
    })?;
    let bundle: ModelBundle = serde_json::from_str(&content).map_err(|err| {
        DocSyncError::invalid_args(format!("invalid model snapshot {}: {}", path.display(), err))
    })?;
    let model = ProgramModel::from_bundle(&bundle)?;
    debug!(
        path = %path.display(),
        types = model.type_count(),
        methods = model.method_count(),
        fields = model.field_count(),
        "loaded model snapshot"
    );
    Ok(model)
}

/// Write a model back out as a JSON snapshot.
pub fn write_model(model: &ProgramModel, path: &Path) -> Result<(), DocSyncError> {
    let bundle = ModelBundle::from_model(model);
    let json = serde_json::to_string_pretty(&bundle)
        .map_err(|err| DocSyncError::internal(format!("cannot serialize model: {}", err)))?;
    std::fs::write(path, json + "\n").map_err(|err| {
        DocSyncError::internal(format!("cannot write {}: {}", path.display(), err))
    })?;
    info!(path = %path.display(), "wrote updated model snapshot");
    Ok(())
}

/// Built-in templates, overlaid with `<category>.tpl` files from `dir` if given.
pub fn load_templates(dir: Option<&Path>) -> Result<OverlayTemplates, DocSyncError> {
    match dir {
        Some(dir) => Ok(OverlayTemplates::from_dir(dir)?),
        None => Ok(OverlayTemplates::new()),
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Per-field overrides layered over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub method_detection_level: Option<Visibility>,
    pub check_inner_classes: Option<bool>,
    pub check_anonymous_classes: Option<bool>,
    pub single_line_references: Option<bool>,
    pub interface_scope: Option<InterfaceSearchScope>,
}

impl ConfigOverrides {
    /// Apply every set override to `config`.
    pub fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(level) = self.method_detection_level {
            config = config.with_method_detection_level(level);
        }
        if let Some(enabled) = self.check_inner_classes {
            config = config.with_inner_classes(enabled);
        }
        if let Some(enabled) = self.check_anonymous_classes {
            config = config.with_anonymous_classes(enabled);
        }
        if let Some(enabled) = self.single_line_references {
            config = config.with_single_line_references(enabled);
        }
        if let Some(scope) = self.interface_scope {
            config = config.with_interface_scope(scope);
        }
        config
    }
}

/// Defaults, then the config file (if any), then flag overrides.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<AnalysisConfig, DocSyncError> {
    let base = match path {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    Ok(overrides.apply(base))
}

// ============================================================================
// Check
// ============================================================================

/// Run every diagnostic over the model.
pub fn run_check(
    model: &ProgramModel,
    config: &AnalysisConfig,
    templates: &dyn TemplateSource,
) -> CheckResponse {
    let analyzer = Analyzer::new(model, config, templates);
    let diagnostics = analyzer
        .check_all()
        .iter()
        .map(|d| d.to_info(model))
        .collect();
    let summary = CheckSummary {
        types: model.type_count(),
        methods: model.method_count(),
        fields: model.field_count(),
        diagnostics: 0,
    };
    CheckResponse::new(diagnostics, summary)
}

/// Plain-text rendering of a check response, one diagnostic per line.
pub fn render_check_text(response: &CheckResponse) -> String {
    let mut out = String::new();
    for diag in &response.diagnostics {
        let fixes: Vec<&str> = diag.fixes.iter().map(|f| f.id.as_str()).collect();
        out.push_str(&format!("{}: [{}] {}", diag.decl, diag.code, diag.message));
        if !fixes.is_empty() {
            out.push_str(&format!(" (fixes: {})", fixes.join(", ")));
        }
        out.push('\n');
    }
    let summary = &response.summary;
    out.push_str(&format!(
        "{} diagnostic(s) in {} type(s), {} method(s), {} field(s)\n",
        summary.diagnostics, summary.types, summary.methods, summary.fields
    ));
    out
}

// ============================================================================
// Fix
// ============================================================================

/// Compute the fix `fix_id` offered on the declaration at `decl_path`.
///
/// With `write` set, the plan is applied to `model` and the updated snapshot
/// is written there. An atomic plan that fails to apply writes nothing and
/// is reported as an error; an independent plan reports per-member failures
/// in the response.
pub fn run_fix(
    model: &mut ProgramModel,
    config: &AnalysisConfig,
    templates: &dyn TemplateSource,
    merge: MergeContext,
    decl_path: &str,
    fix_id: &str,
    write: Option<&Path>,
) -> Result<FixResponse, DocSyncError> {
    let kind = FixKind::from_id(fix_id).ok_or_else(|| {
        DocSyncError::invalid_args_with_details(
            format!("unknown fix '{}'", fix_id),
            serde_json::json!({
                "known": FixKind::ALL.iter().map(|k| k.id()).collect::<Vec<_>>()
            }),
        )
    })?;

    let plan = plan_fix(model, config, templates, merge, decl_path, kind)?;
    let edits = edit_infos(model, &plan);

    let Some(out) = write else {
        return Ok(FixResponse::new(
            kind.id(),
            decl_path,
            edits,
            false,
            failure_infos(model, &plan.failures),
        ));
    };

    let report = plan.apply(&mut *model);
    if plan.mode == ApplyMode::Atomic {
        if let Some(first) = report.failed.first() {
            return Err(DocSyncError::ApplyError {
                message: first.reason.clone(),
                decl: Some(path_of(model, first.decl)),
            });
        }
    }
    if !report.applied.is_empty() {
        write_model(model, out)?;
    }
    info!(
        fix = kind.id(),
        applied = report.applied.len(),
        failed = report.failed.len(),
        "fix applied"
    );
    Ok(FixResponse::new(
        kind.id(),
        decl_path,
        edits,
        !report.applied.is_empty(),
        failure_infos(model, &report.failed),
    ))
}

fn plan_fix(
    model: &ProgramModel,
    config: &AnalysisConfig,
    templates: &dyn TemplateSource,
    merge: MergeContext,
    decl_path: &str,
    kind: FixKind,
) -> Result<EditPlan, DocSyncError> {
    let decl = resolve_path(model, decl_path)?;
    let analyzer = Analyzer::new(model, config, templates);
    let request = offered_fix(&analyzer, decl, kind)?;
    let ctx = FixContext::new(model, config, templates).with_merge_context(merge);
    let plan = compute_fix(&ctx, &request)?;
    debug!(
        fix = kind.id(),
        decl = decl_path,
        edits = plan.edits.len(),
        "computed fix"
    );
    Ok(plan)
}

fn path_of(model: &ProgramModel, decl: DeclId) -> String {
    model.decl_path(decl).unwrap_or_else(|| decl.to_string())
}

fn edit_infos(model: &ProgramModel, plan: &EditPlan) -> Vec<EditInfo> {
    plan.edits
        .iter()
        .map(|edit| EditInfo {
            decl: path_of(model, edit.target),
            mode: match edit.mode {
                EditMode::Replace => "replace",
                EditMode::InsertBefore => "insert_before",
            }
            .to_string(),
            new_text: edit.new_text.clone(),
        })
        .collect()
}

fn failure_infos(model: &ProgramModel, failures: &[MemberFailure]) -> Vec<FailureInfo> {
    failures
        .iter()
        .map(|f| FailureInfo {
            decl: path_of(model, f.decl),
            reason: f.reason.clone(),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use docsync_core::error::OutputErrorCode;
    use docsync_javadoc::templates::BuiltinTemplates;
    use docsync_javadoc::test_helpers::Fixture;

    fn merge() -> MergeContext {
        MergeContext::new(
            Some("ray".to_string()),
            NaiveDate::from_ymd_opt(2007, 2, 24).unwrap(),
        )
    }

    mod config_tests {
        use super::*;

        #[test]
        fn overrides_layer_on_defaults() {
            let overrides = ConfigOverrides {
                method_detection_level: Some(Visibility::Protected),
                single_line_references: Some(false),
                ..Default::default()
            };
            let config = resolve_config(None, &overrides).unwrap();
            assert_eq!(config.method_detection_level, Visibility::Protected);
            assert!(!config.single_line_references);
            assert!(config.check_inner_classes);
        }

        #[test]
        fn overrides_win_over_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.json");
            std::fs::write(
                &path,
                r#"{"check_inner_classes": false, "interface_scope": "declaring_type"}"#,
            )
            .unwrap();
            let overrides = ConfigOverrides {
                check_inner_classes: Some(true),
                ..Default::default()
            };
            let config = resolve_config(Some(&path), &overrides).unwrap();
            assert!(config.check_inner_classes);
            assert_eq!(config.interface_scope, InterfaceSearchScope::DeclaringType);
        }

        #[test]
        fn missing_config_file() {
            let err = resolve_config(
                Some(Path::new("/nonexistent/docsync.json")),
                &ConfigOverrides::default(),
            )
            .unwrap_err();
            assert!(matches!(err, DocSyncError::FileNotFound { .. }));
        }
    }

    mod check_tests {
        use super::*;

        #[test]
        fn check_counts_declarations() {
            let fx = Fixture::p1p2();
            let config = AnalysisConfig::default();
            let response = run_check(&fx.model, &config, &BuiltinTemplates);
            assert_eq!(response.status, "ok");
            assert_eq!(response.summary.types, 10);
            assert_eq!(response.summary.diagnostics, response.diagnostics.len());
            assert!(response
                .diagnostics
                .iter()
                .any(|d| d.decl == "p1.p2.ClassExtendingObject#methodWithoutJavaDoc()"));
        }

        #[test]
        fn text_rendering_lists_fixes() {
            let fx = Fixture::p1p2();
            let config = AnalysisConfig::default();
            let response = run_check(&fx.model, &config, &BuiltinTemplates);
            let text = render_check_text(&response);
            assert!(text.contains("p1.p2.ColorEnum#r: [field-missing-doc]"));
            assert!(text.contains("fixes: generate-from-field"));
            assert!(text.ends_with(" field(s)\n"));
        }
    }

    mod fix_tests {
        use super::*;

        #[test]
        fn unknown_fix_id() {
            let mut fx = Fixture::p1p2();
            let config = AnalysisConfig::default();
            let err = run_fix(
                &mut fx.model,
                &config,
                &BuiltinTemplates,
                merge(),
                "p1.p2.ColorEnum",
                "make-it-better",
                None,
            )
            .unwrap_err();
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
        }

        #[test]
        fn unresolved_declaration() {
            let mut fx = Fixture::p1p2();
            let config = AnalysisConfig::default();
            let err = run_fix(
                &mut fx.model,
                &config,
                &BuiltinTemplates,
                merge(),
                "p1.p2.Nope#f()",
                "generate-from-signature",
                None,
            )
            .unwrap_err();
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        }

        #[test]
        fn dry_run_leaves_model_untouched() {
            let mut fx = Fixture::p1p2();
            let config = AnalysisConfig::default();
            let path = "p1.p2.ClassImplementingInterface#myMockField";
            let response = run_fix(
                &mut fx.model,
                &config,
                &BuiltinTemplates,
                merge(),
                path,
                "generate-from-field",
                None,
            )
            .unwrap();
            assert_eq!(response.status, "ok");
            assert!(!response.applied);
            assert_eq!(response.edits[0].mode, "insert_before");
            assert_eq!(response.edits[0].new_text, "/** Field myMockField */");
            assert_eq!(fx.doc(path), None);
        }

        #[test]
        fn write_applies_and_saves() {
            let dir = tempfile::tempdir().unwrap();
            let out = dir.path().join("out.json");
            let mut fx = Fixture::p1p2();
            let config = AnalysisConfig::default();
            let path = "p1.p2.ClassImplementingInterface#myMockField";
            let response = run_fix(
                &mut fx.model,
                &config,
                &BuiltinTemplates,
                merge(),
                path,
                "generate-from-field",
                Some(&out),
            )
            .unwrap();
            assert!(response.applied);
            assert_eq!(fx.doc(path), Some("/** Field myMockField */"));

            let reloaded = load_model(&out).unwrap();
            let decl = resolve_path(&reloaded, path).unwrap();
            assert_eq!(reloaded.doc(decl), Some("/** Field myMockField */"));
        }

        #[test]
        fn atomic_failure_is_an_apply_error() {
            let dir = tempfile::tempdir().unwrap();
            let out = dir.path().join("out.json");
            let mut fx = Fixture::p1p2();
            fx.set_writable("p1.p2.ClassImplementingInterface", false);
            let config = AnalysisConfig::default();
            let err = run_fix(
                &mut fx.model,
                &config,
                &BuiltinTemplates,
                merge(),
                "p1.p2.ClassImplementingInterface#myMockField",
                "generate-from-field",
                Some(&out),
            )
            .unwrap_err();
            assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
            assert!(!out.exists());
        }
    }

    mod input_tests {
        use super::*;

        #[test]
        fn missing_snapshot() {
            let err = load_model(Path::new("/nonexistent/model.json")).unwrap_err();
            assert!(matches!(err, DocSyncError::FileNotFound { .. }));
        }

        #[test]
        fn malformed_snapshot() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("model.json");
            std::fs::write(&path, "{ not json").unwrap();
            let err = load_model(&path).unwrap_err();
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
        }

        #[test]
        fn template_overrides_from_dir() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("field.tpl"), "/** The ${NAME} */\n").unwrap();
            let templates = load_templates(Some(dir.path())).unwrap();
            let mut fx = Fixture::p1p2();
            let config = AnalysisConfig::default();
            let response = run_fix(
                &mut fx.model,
                &config,
                &templates,
                merge(),
                "p1.p2.ColorEnum#r",
                "generate-from-field",
                None,
            )
            .unwrap();
            assert_eq!(response.edits[0].new_text, "/** The r */");
        }
    }
}
