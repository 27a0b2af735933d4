//! Console and JSON output for the CLI.
//!
//! With `--json` every command prints exactly one document on stdout: a
//! `{success, data, metadata}` envelope on success or a
//! `{success: false, error, metadata}` envelope on failure. The error code in
//! that envelope also decides the process exit code.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt::Display;
use std::io::{self, Write};

use crate::domain::{ChainEnd, Employee, OrgGraph};
use crate::errors::OrgchartError;
use crate::renderer::RenderFailure;

/// Version of the JSON output format
const OUTPUT_VERSION: &str = "0.1.0";

/// Where human-readable output goes for one command
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Command result on stdout; nothing in JSON mode
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        write_line(io::stdout().lock(), msg)
    }

    /// Data-quality warning on stderr; silenced by --quiet and --json
    pub fn print_warning(&self, msg: impl Display) -> io::Result<()> {
        if self.quiet || self.json {
            return Ok(());
        }
        write_line(io::stderr().lock(), format_args!("Warning: {}", msg))
    }
}

// A reader that went away (`orgchart graph 1 | head`) is not an error
fn write_line(mut out: impl Write, line: impl Display) -> io::Result<()> {
    match writeln!(out, "{}", line) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => std::process::exit(0),
        result => result,
    }
}

/// Successful `--json` result
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T, command: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata::now(command),
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Failed `--json` result
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// One of the [`ErrorCode`] constants
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl JsonError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
                suggestions: Vec::new(),
            },
            metadata: Metadata::now(command),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.error.suggestions.push(suggestion.into());
        self
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn exit_code(&self) -> ExitCode {
        ErrorCode::to_exit_code(&self.error.code)
    }

    /// Describe a command failure.
    ///
    /// The first [`OrgchartError`] or [`RenderFailure`] in the context chain
    /// picks the code; the message is the whole chain.
    pub fn from_error(error: &anyhow::Error, command: &str) -> Self {
        let message = format!("{:#}", error);

        for cause in error.chain() {
            if let Some(err) = cause.downcast_ref::<OrgchartError>() {
                return Self::from_orgchart_error(err, message, command);
            }
            if let Some(failure) = cause.downcast_ref::<RenderFailure>() {
                return Self::render_failed(failure, command);
            }
        }
        Self::new(ErrorCode::GENERIC_ERROR, message, command)
    }

    fn from_orgchart_error(err: &OrgchartError, message: String, command: &str) -> Self {
        match err {
            OrgchartError::EmployeeNotFound(id) => Self::employee_not_found(id, command),
            OrgchartError::Io { path, .. } if err.is_not_found() => {
                Self::new(ErrorCode::FILE_NOT_FOUND, message, command)
                    .with_details(json!({ "path": path }))
                    .with_suggestion("Check the paths under [sources] and passed with --source")
            }
            OrgchartError::Io { path, .. } => {
                Self::new(ErrorCode::IO_ERROR, message, command).with_details(json!({ "path": path }))
            }
            OrgchartError::Parse { path, .. } => Self::new(ErrorCode::PARSE_ERROR, message, command)
                .with_details(json!({ "path": path }))
                .with_suggestion(
                    "A collection file holds a JSON array of employees or {\"employees\": [...]}",
                ),
            OrgchartError::Config { path, .. } => Self::new(ErrorCode::CONFIG_ERROR, message, command)
                .with_details(json!({ "path": path })),
            OrgchartError::Roles(_) => Self::new(ErrorCode::CONFIG_ERROR, message, command),
            OrgchartError::NoSources | OrgchartError::InvalidArgument(_) => {
                Self::new(ErrorCode::INVALID_ARGUMENT, message, command)
            }
        }
    }

    pub fn employee_not_found(employee_id: &str, command: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::EMPLOYEE_NOT_FOUND,
            format!("Employee not found: {}", employee_id),
            command,
        )
        .with_details(json!({ "employee_id": employee_id }))
        .with_suggestion("Check that the employee id is correct")
        .with_suggestion("Pass the collection containing the employee with --source")
    }

    pub fn render_failed(failure: &RenderFailure, command: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorCode::RENDER_FAILED, failure.to_string(), command);
        if let Some(diagram_id) = failure.diagram_id() {
            error = error.with_details(json!({ "diagram_id": diagram_id }));
        }
        if let RenderFailure::Unavailable(_) = failure {
            error = error.with_suggestion("Install the Mermaid CLI or set mmdc_path under [render]");
        }
        error.with_suggestion("Print the raw description with --render none to inspect it")
    }
}

/// Data payload of `orgchart graph --json`
#[derive(Debug, Serialize)]
pub struct GraphResponse<'a> {
    pub graph: &'a OrgGraph,
    pub diagram_id: &'a str,
    pub format: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup: Option<&'a str>,
}

/// Data payload of `orgchart chain --json`
#[derive(Debug, Serialize)]
pub struct ChainResponse<'a> {
    pub employee_id: &'a str,
    pub ancestors: Vec<&'a Employee>,
    pub count: usize,
    /// Why the walk stopped
    pub end: &'a ChainEnd,
}

/// Data payload of `orgchart reports --json`
#[derive(Debug, Serialize)]
pub struct ReportsResponse<'a> {
    pub employee_id: &'a str,
    pub reports: Vec<&'a Employee>,
    pub count: usize,
}

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GenericError = 1,
    /// Bad flags, bad config, nothing to read
    InvalidArgument = 2,
    /// Unknown employee or missing collection file
    NotFound = 3,
    RenderFailed = 4,
    /// Collection file unreadable or malformed
    ExternalError = 10,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Error codes used in JSON error envelopes
pub struct ErrorCode;

impl ErrorCode {
    pub const GENERIC_ERROR: &'static str = "GENERIC_ERROR";
    pub const EMPLOYEE_NOT_FOUND: &'static str = "EMPLOYEE_NOT_FOUND";
    pub const FILE_NOT_FOUND: &'static str = "FILE_NOT_FOUND";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const RENDER_FAILED: &'static str = "RENDER_FAILED";
    pub const IO_ERROR: &'static str = "IO_ERROR";
    pub const PARSE_ERROR: &'static str = "PARSE_ERROR";
    pub const CONFIG_ERROR: &'static str = "CONFIG_ERROR";

    pub fn to_exit_code(code: &str) -> ExitCode {
        match code {
            Self::EMPLOYEE_NOT_FOUND | Self::FILE_NOT_FOUND => ExitCode::NotFound,
            Self::INVALID_ARGUMENT | Self::CONFIG_ERROR => ExitCode::InvalidArgument,
            Self::RENDER_FAILED => ExitCode::RenderFailed,
            Self::IO_ERROR | Self::PARSE_ERROR => ExitCode::ExternalError,
            _ => ExitCode::GenericError,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    #[serde(serialize_with = "rfc3339")]
    pub timestamp: DateTime<Utc>,
    /// Output format version
    pub version: String,
    pub command: String,
}

impl Metadata {
    fn now(command: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            version: OUTPUT_VERSION.to_string(),
            command: command.into(),
        }
    }
}

fn rfc3339<S: Serializer>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339())
}
