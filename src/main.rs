//! Binary entry point for the docsync CLI.
//!
//! ## Usage
//!
//! ```bash
//! # List diagnostics for a model snapshot
//! docsync check --model model.json
//!
//! # Preview a fix
//! docsync fix --model model.json --decl 'p1.Child#f()' --fix add-reference
//!
//! # Apply it and write the updated snapshot
//! docsync fix --model model.json --decl 'p1.Child#f()' --fix add-reference --write out.json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use docsync::cli::{
    load_model, load_templates, render_check_text, resolve_config, run_check, run_fix,
    ConfigOverrides,
};
use docsync::config::InterfaceSearchScope;
use docsync::error::{DocSyncError, OutputErrorCode};
use docsync::model::Visibility;
use docsync::output::{emit_response, ErrorResponse};
use docsync::templates::MergeContext;

// ============================================================================
// CLI Structure
// ============================================================================

/// Javadoc consistency checks and fixes.
///
/// Reads a JSON model snapshot. All output is JSON unless a text format is
/// requested.
#[derive(Parser, Debug)]
#[command(name = "docsync", version, about = "Javadoc consistency checks and fixes")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Analysis configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of `<category>.tpl` template overrides.
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Least visible method access level that is checked.
    #[arg(long, global = true, value_enum)]
    method_detection_level: Option<VisibilityArg>,

    /// Check nested (inner) classes.
    #[arg(long, global = true)]
    check_inner_classes: Option<bool>,

    /// Check anonymous classes.
    #[arg(long, global = true)]
    check_anonymous_classes: Option<bool>,

    /// Format generated `@see` references on a single line.
    #[arg(long, global = true)]
    single_line_references: Option<bool>,

    /// Which interfaces the super-method search visits.
    #[arg(long, global = true, value_enum)]
    interface_scope: Option<ScopeArg>,
}

impl GlobalArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            method_detection_level: self.method_detection_level.map(Visibility::from),
            check_inner_classes: self.check_inner_classes,
            check_anonymous_classes: self.check_anonymous_classes,
            single_line_references: self.single_line_references,
            interface_scope: self.interface_scope.map(InterfaceSearchScope::from),
        }
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VisibilityArg {
    Public,
    Protected,
    Default,
    Private,
}

impl From<VisibilityArg> for Visibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Public => Visibility::Public,
            VisibilityArg::Protected => Visibility::Protected,
            VisibilityArg::Default => Visibility::Default,
            VisibilityArg::Private => Visibility::Private,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    DeclaringType,
    EachAncestor,
}

impl From<ScopeArg> for InterfaceSearchScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::DeclaringType => InterfaceSearchScope::DeclaringType,
            ScopeArg::EachAncestor => InterfaceSearchScope::EachAncestor,
        }
    }
}

/// Output format for the check command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum CheckFormat {
    /// Full JSON response (default).
    #[default]
    Json,
    /// One line per diagnostic.
    Text,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Report documentation diagnostics.
    Check {
        /// Model snapshot (JSON).
        #[arg(long)]
        model: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: CheckFormat,
    },
    /// Compute a fix offered on a declaration.
    ///
    /// Prints the planned edits; `--write` applies them and writes the
    /// updated snapshot.
    Fix {
        /// Model snapshot (JSON).
        #[arg(long)]
        model: PathBuf,
        /// Declaration path: `pkg.Type`, `pkg.Type#field`, or `pkg.Type#method(T1, T2)`.
        #[arg(long)]
        decl: String,
        /// Fix id, e.g. `add-reference` or `generate-from-signature`.
        #[arg(long)]
        fix: String,
        /// Write the updated snapshot to this file.
        #[arg(long)]
        write: Option<PathBuf>,
        /// Value for `${USER}` in templates (default: $USER).
        #[arg(long)]
        user: Option<String>,
        /// Value for `${DATE}` in templates, as YYYY-MM-DD (default: today).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

/// Parse a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}', expected YYYY-MM-DD: {}", s, e))
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_json);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber on stderr. `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), DocSyncError> {
    let config = resolve_config(cli.global.config.as_deref(), &cli.global.overrides())?;
    let templates = load_templates(cli.global.templates.as_deref())?;

    match cli.command {
        Command::Check { model, format } => {
            let model = load_model(&model)?;
            let response = run_check(&model, &config, &templates);
            match format {
                CheckFormat::Json => emit_response(&response, &mut io::stdout())
                    .map_err(|e| DocSyncError::internal(e.to_string()))?,
                CheckFormat::Text => print!("{}", render_check_text(&response)),
            }
            Ok(())
        }
        Command::Fix {
            model,
            decl,
            fix,
            write,
            user,
            date,
        } => {
            let mut program = load_model(&model)?;
            let now = MergeContext::now();
            let merge = MergeContext::new(user.or(now.user), date.unwrap_or(now.date));
            let response = run_fix(
                &mut program,
                &config,
                &templates,
                merge,
                &decl,
                &fix,
                write.as_deref(),
            )?;
            emit_response(&response, &mut io::stdout())
                .map_err(|e| DocSyncError::internal(e.to_string()))?;
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn parse_check_defaults() {
            let cli = Cli::try_parse_from(["docsync", "check", "--model", "m.json"]).unwrap();
            match cli.command {
                Command::Check { model, format } => {
                    assert_eq!(model, PathBuf::from("m.json"));
                    assert_eq!(format, CheckFormat::Json);
                }
                other => panic!("unexpected command: {other:?}"),
            }
            assert_eq!(cli.global.overrides(), ConfigOverrides::default());
        }

        #[test]
        fn parse_check_text() {
            let cli =
                Cli::try_parse_from(["docsync", "check", "--model", "m.json", "--format", "text"])
                    .unwrap();
            assert!(matches!(
                cli.command,
                Command::Check {
                    format: CheckFormat::Text,
                    ..
                }
            ));
        }

        #[test]
        fn parse_fix() {
            let cli = Cli::try_parse_from([
                "docsync",
                "fix",
                "--model",
                "m.json",
                "--decl",
                "p1.C#f(int)",
                "--fix",
                "copy-from-parent",
                "--write",
                "out.json",
                "--date",
                "2007-02-24",
            ])
            .unwrap();
            match cli.command {
                Command::Fix {
                    decl,
                    fix,
                    write,
                    date,
                    user,
                    ..
                } => {
                    assert_eq!(decl, "p1.C#f(int)");
                    assert_eq!(fix, "copy-from-parent");
                    assert_eq!(write, Some(PathBuf::from("out.json")));
                    assert_eq!(date, NaiveDate::from_ymd_opt(2007, 2, 24));
                    assert_eq!(user, None);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }

        #[test]
        fn parse_bad_date() {
            let result = Cli::try_parse_from([
                "docsync", "fix", "--model", "m.json", "--decl", "p1.C", "--fix", "x", "--date",
                "24.02.2007",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn parse_config_overrides() {
            let cli = Cli::try_parse_from([
                "docsync",
                "check",
                "--model",
                "m.json",
                "--method-detection-level",
                "protected",
                "--check-inner-classes",
                "false",
                "--single-line-references",
                "false",
                "--interface-scope",
                "declaring-type",
            ])
            .unwrap();
            let overrides = cli.global.overrides();
            assert_eq!(overrides.method_detection_level, Some(Visibility::Protected));
            assert_eq!(overrides.check_inner_classes, Some(false));
            assert_eq!(overrides.check_anonymous_classes, None);
            assert_eq!(overrides.single_line_references, Some(false));
            assert_eq!(
                overrides.interface_scope,
                Some(InterfaceSearchScope::DeclaringType)
            );
        }

        #[test]
        fn parse_global_flags_after_subcommand() {
            let cli = Cli::try_parse_from([
                "docsync",
                "check",
                "--model",
                "m.json",
                "--config",
                "docsync.json",
                "--templates",
                "tpl",
                "--log-level",
                "debug",
            ])
            .unwrap();
            assert_eq!(cli.global.config, Some(PathBuf::from("docsync.json")));
            assert_eq!(cli.global.templates, Some(PathBuf::from("tpl")));
            assert!(matches!(cli.global.log_level, LogLevel::Debug));
        }
    }
}
