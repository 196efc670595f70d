//! End-to-end tests for the `docsync` binary.
//!
//! Each test runs the built binary against `tests/fixtures/shapes.json`
//! (or a copy in a temp dir) and inspects the JSON written to stdout.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

use docsync::cli::load_model;
use docsync::lookup::resolve_path;

// ============================================================================
// Test Infrastructure
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn docsync(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docsync"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run docsync binary")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn diagnostic<'a>(response: &'a Value, decl: &str) -> Option<&'a Value> {
    response["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["decl"] == decl)
}

fn fix_ids(diagnostic: &Value) -> Vec<&str> {
    diagnostic["fixes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect()
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_reports_drift_and_missing_docs() {
    let model = fixture("shapes.json");
    let output = docsync(&["check", "--model", model.to_str().unwrap()]);
    assert!(output.status.success());

    let response = stdout_json(&output);
    assert_eq!(response["status"], "ok");
    assert_eq!(response["schema_version"], "1");
    assert_eq!(response["summary"]["types"], 5);

    let drift = diagnostic(&response, "p1.Child#f()").unwrap();
    assert_eq!(drift["code"], "doc-differs-from-parent");
    assert_eq!(fix_ids(drift), vec!["add-reference", "copy-from-parent"]);

    let implementation = diagnostic(&response, "p1.C#g(int)").unwrap();
    assert_eq!(implementation["code"], "implementation-missing-doc");
    assert_eq!(fix_ids(implementation), vec!["generate-from-signature"]);

    // Overrides of root methods are never reported
    assert!(diagnostic(&response, "p1.Child#toString()").is_none());
}

#[test]
fn check_text_format() {
    let model = fixture("shapes.json");
    let output = docsync(&["check", "--model", model.to_str().unwrap(), "--format", "text"]);
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("p1.Child#f(): [doc-differs-from-parent]"));
    assert!(text.contains("in 5 type(s)"));
}

#[test]
fn check_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("docsync.json");
    fs::write(&config, r#"{"method_detection_level": "public"}"#).unwrap();
    let model = fixture("shapes.json");
    let output = docsync(&[
        "check",
        "--model",
        model.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--interface-scope",
        "declaring-type",
    ]);
    assert!(output.status.success());
    let response = stdout_json(&output);
    assert!(diagnostic(&response, "p1.C#g(int)").is_some());
}

// ============================================================================
// fix
// ============================================================================

#[test]
fn fix_preview_does_not_write() {
    let model = fixture("shapes.json");
    let before = fs::read_to_string(&model).unwrap();
    let output = docsync(&[
        "fix",
        "--model",
        model.to_str().unwrap(),
        "--decl",
        "p1.Child#f()",
        "--fix",
        "add-reference",
    ]);
    assert!(output.status.success());

    let response = stdout_json(&output);
    assert_eq!(response["status"], "ok");
    assert_eq!(response["fix"], "add-reference");
    assert_eq!(response["applied"], false);
    assert_eq!(response["edits"][0]["decl"], "p1.Child#f()");
    assert_eq!(
        response["edits"][0]["new_text"],
        "/**\n * B\n * @see Base#f()\n */"
    );
    assert_eq!(fs::read_to_string(&model).unwrap(), before);
}

#[test]
fn fix_write_resolves_the_diagnostic() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.json");
    let model = fixture("shapes.json");
    let output = docsync(&[
        "fix",
        "--model",
        model.to_str().unwrap(),
        "--decl",
        "p1.Child#f()",
        "--fix",
        "copy-from-parent",
        "--write",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["applied"], true);

    let updated = load_model(&out).unwrap();
    let decl = resolve_path(&updated, "p1.Child#f()").unwrap();
    assert_eq!(updated.doc(decl), Some("/** A */"));

    let output = docsync(&["check", "--model", out.to_str().unwrap()]);
    let response = stdout_json(&output);
    assert!(diagnostic(&response, "p1.Child#f()").is_none());
}

#[test]
fn fix_generates_from_signature() {
    let model = fixture("shapes.json");
    let output = docsync(&[
        "fix",
        "--model",
        model.to_str().unwrap(),
        "--decl",
        "p1.C#g(int)",
        "--fix",
        "generate-from-signature",
        "--user",
        "ray",
        "--date",
        "2007-02-24",
    ]);
    assert!(output.status.success());
    let response = stdout_json(&output);
    let text = response["edits"][0]["new_text"].as_str().unwrap();
    assert!(text.contains("@param x of type int"));
    assert!(!text.contains("@return"));
    assert!(!text.contains("@throws"));
}

// ============================================================================
// errors
// ============================================================================

#[test]
fn unknown_declaration_exits_with_resolution_code() {
    let model = fixture("shapes.json");
    let output = docsync(&[
        "fix",
        "--model",
        model.to_str().unwrap(),
        "--decl",
        "p1.Missing#f()",
        "--fix",
        "add-reference",
    ]);
    assert_eq!(output.status.code(), Some(3));
    let response = stdout_json(&output);
    assert_eq!(response["status"], "error");
    assert_eq!(response["error"]["code"], 3);
}

#[test]
fn fix_not_offered_is_invalid_arguments() {
    let model = fixture("shapes.json");
    let output = docsync(&[
        "fix",
        "--model",
        model.to_str().unwrap(),
        "--decl",
        "p1.Base#f()",
        "--fix",
        "copy-from-parent",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let response = stdout_json(&output);
    assert_eq!(response["error"]["details"]["fix"], "copy-from-parent");
}

#[test]
fn missing_model_file() {
    let output = docsync(&["check", "--model", "/nonexistent/model.json"]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout_json(&output)["status"], "error");
}
