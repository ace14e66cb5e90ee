// crates/session-check-cli/src/main.rs
// ============================================================================
// Module: Session Check CLI Entry Point
// Description: Command dispatcher for session document validation.
// Purpose: Validate session JSON files and list the registered contracts.
// Dependencies: clap, serde_json, session-check-api, session-check-config, thiserror.
// ============================================================================

//! ## Overview
//! `session-check validate` reads one session document, runs the full
//! validation pass, prints the diagnostics, and records one audit event when
//! auditing is enabled. The exit code is `0` when the document passes, `2`
//! when it is rejected, and `1` when the input or configuration cannot be
//! used. All user-facing strings are routed through the message catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde_json::Value;
use session_check_api::SessionValidator;
use session_check_api::registry;
use session_check_cli::report;
use session_check_cli::report::Outcome;
use session_check_cli::t;
use session_check_config::OutputFormat;
use session_check_config::SessionCheckConfig;
use session_check_core::FileAuditSink;
use session_check_core::StderrAuditSink;
use session_check_core::ValidationAuditSink;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Exit code for a document rejected by validation.
const EXIT_REJECTED: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "session-check", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a session document.
    Validate(ValidateCommand),
    /// List every registered API path and its contract.
    Contracts,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Session document (JSON).
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Config file (overrides `SESSION_CHECK_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Field name to skip at every level; repeatable.
    #[arg(long = "ignore-key", value_name = "KEY")]
    ignore_keys: Vec<String>,
    /// Report format (overrides `output.format`).
    #[arg(long, value_enum, value_name = "FORMAT")]
    format: Option<FormatArg>,
}

/// Report formats accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    /// Human-readable lines.
    Text,
    /// Serialized diagnostic list.
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Validate(command) => command_validate(command),
        Commands::Contracts => command_contracts(),
    }
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("")
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Validates one session document.
fn command_validate(command: ValidateCommand) -> CliResult<ExitCode> {
    let config = SessionCheckConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let session = read_session(&command.input, config.validation.max_input_bytes)?;

    let mut ignore_keys = config.validation.ignore_keys.clone();
    ignore_keys.extend(command.ignore_keys);

    let validator = if config.audit.enabled {
        let sink = audit_sink(config.audit.path.as_deref())?;
        SessionValidator::with_audit(&session, ignore_keys, sink.as_ref())
    } else {
        SessionValidator::new(&session, ignore_keys)
    };
    let log = validator.log();

    let format = command.format.map_or(config.output.format, OutputFormat::from);
    match format {
        OutputFormat::Text => {
            for line in report::render_text(log) {
                write_stdout_line(&line)?;
            }
        }
        OutputFormat::Json => {
            let rendered = report::render_json(log)
                .map_err(|err| CliError::new(t!("report.encode_failed", error = err)))?;
            write_stdout_line(&rendered)?;
        }
    }

    Ok(match report::outcome(log, config.validation.fail_on_warnings) {
        Outcome::Passed => ExitCode::SUCCESS,
        Outcome::Failed => ExitCode::from(EXIT_REJECTED),
    })
}

/// Lists the contract registry in path order.
fn command_contracts() -> CliResult<ExitCode> {
    for (path, contract) in registry().iter() {
        write_stdout_line(&t!("contracts.entry", path = path, name = contract.name()))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Inputs
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses the session document.
fn read_session(path: &Path, max_bytes: usize) -> CliResult<Value> {
    let kind = t!("input.kind.session");
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(t!(
            "input.read_failed",
            kind = kind,
            path = path.display(),
            error = err
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

/// Opens the configured audit sink: a file when a path is set, else stderr.
fn audit_sink(path: Option<&Path>) -> CliResult<Box<dyn ValidationAuditSink>> {
    let Some(path) = path else {
        return Ok(Box::new(StderrAuditSink));
    };
    let sink = FileAuditSink::new(path).map_err(|err| {
        CliError::new(t!("audit.open_failed", path = path.display(), error = err))
    })?;
    Ok(Box::new(sink))
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
