//! Transpilers backed by an external compiler process.
//!
//! The source text is written to the process's stdin and the compiled code
//! read from stdout. Declared in the project configuration (`transpilers`)
//! or in plugin manifests:
//!
//! ```json
//! {
//!   "extension": ".cof",
//!   "targetExtension": ".ts",
//!   "command": "coffee",
//!   "args": ["--compile", "--stdio", "--bare"],
//!   "output": "text"
//! }
//! ```
//!
//! The placeholder `{path}` in `args` is replaced by the source path.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use serde::Deserialize;
use serde_json::Value;

use super::descriptor::{Transpiled, Transpiler, TranspilerDescriptor};
use super::position::PositionMap;
use crate::diagnostic::{PluginError, TranspileError};

/// How a compiler process writes its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Stdout is the compiled code.
    #[default]
    Text,
    /// Stdout is `{"code": "...", "map": [[[genCol, origLine, origCol]]]}`.
    Json,
}

/// Declarative description of a command-backed transpiler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    /// Source extension.
    pub extension: String,
    /// Target extension.
    pub target_extension: String,
    /// Program to run.
    pub command: String,
    /// Program arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Output format.
    #[serde(default)]
    pub output: OutputFormat,
}

impl CommandSpec {
    /// Check the spec and turn it into a registrable descriptor.
    pub fn into_descriptor(self) -> Result<TranspilerDescriptor, PluginError> {
        for (field, value) in [
            ("extension", &self.extension),
            ("targetExtension", &self.target_extension),
            ("command", &self.command),
        ] {
            if value.trim_start_matches('.').trim().is_empty() {
                return Err(PluginError::InvalidDescriptor(format!("`{field}` must not be empty")));
            }
        }
        let transpiler = CommandTranspiler {
            command: self.command,
            args: self.args,
            output: self.output,
        };
        Ok(TranspilerDescriptor::new(&self.extension, &self.target_extension, transpiler))
    }
}

/// Runs an external compiler per compile call.
#[derive(Debug, Clone)]
pub struct CommandTranspiler {
    command: String,
    args: Vec<String>,
    output: OutputFormat,
}

impl CommandTranspiler {
    /// Create a transpiler running `command` with `args`.
    pub fn new(command: impl Into<String>, args: Vec<String>, output: OutputFormat) -> Self {
        Self {
            command: command.into(),
            args,
            output,
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> TranspileError {
        TranspileError::Spawn {
            command: self.command.clone(),
            message: e.to_string(),
        }
    }
}

impl Transpiler for CommandTranspiler {
    fn compile(&self, path: &str, source: &str) -> Result<Transpiled, TranspileError> {
        let args = self.args.iter().map(|arg| arg.replace("{path}", path));
        let mut child = Command::new(&self.command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Feed stdin from a separate thread so a chatty compiler can't
        // deadlock on a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = source.to_owned();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        if let Some(writer) = writer {
            // A compiler may exit without reading its input; that only
            // matters if it also failed, which the status check reports.
            let _ = writer.join();
        }

        if !output.status.success() {
            return Err(TranspileError::Exit {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| TranspileError::MalformedOutput("stdout is not UTF-8".into()))?;

        match self.output {
            OutputFormat::Text => Ok(Transpiled::code(stdout)),
            OutputFormat::Json => parse_json_output(&stdout),
        }
    }
}

fn parse_json_output(stdout: &str) -> Result<Transpiled, TranspileError> {
    let value: Value =
        serde_json::from_str(stdout).map_err(|e| TranspileError::MalformedOutput(e.to_string()))?;
    let code = value
        .get("code")
        .and_then(Value::as_str)
        .ok_or_else(|| TranspileError::MalformedOutput("missing string field `code`".into()))?;
    let position_map = match value.get("map") {
        None | Some(Value::Null) => None,
        Some(map) => Some(
            PositionMap::from_json(map)
                .ok_or_else(|| TranspileError::MalformedOutput("invalid `map`".into()))?,
        ),
    };
    Ok(Transpiled {
        code: code.to_string(),
        position_map,
    })
}
