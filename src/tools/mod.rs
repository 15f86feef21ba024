// src/tools/mod.rs
// External program handling: locating minimap2/samtools and running command lines

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::{PipelineError, Result};

/// Program names or paths of the external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub minimap2: String,
    pub samtools: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            minimap2: "minimap2".to_string(),
            samtools: "samtools".to_string(),
        }
    }
}

/// Locate an executable the way a shell would.
///
/// A value containing a path separator is taken as a path and must point at
/// an executable file. A bare name is searched for in every `PATH` entry.
pub fn require_tool(program: &str) -> Result<PathBuf> {
    let missing = || PipelineError::MissingTool {
        tool: program.to_string(),
    };

    if program.is_empty() {
        return Err(missing());
    }

    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        return if is_executable(as_path) {
            Ok(as_path.to_path_buf())
        } else {
            Err(missing())
        };
    }

    let path_var = env::var_os("PATH").ok_or_else(missing)?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(missing)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// One external invocation: program, arguments, and where stdout goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    /// Passed to the program as-is; only `Display` converts them to text
    pub args: Vec<OsString>,
    /// File receiving the program's stdout; inherited when `None`
    pub stdout: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    /// Run to completion, failing on a non-zero exit.
    ///
    /// stderr is passed through to the terminal.
    pub fn run(&self, step: &str) -> Result<()> {
        debug!(step, command = %self, "running");

        let mut command = Command::new(&self.program);
        command.args(&self.args).stderr(Stdio::inherit());
        match &self.stdout {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    PipelineError::io(format!("cannot create {}", path.display()), e)
                })?;
                command.stdout(file);
            }
            None => {
                command.stdout(Stdio::inherit());
            }
        }

        let status = command.status().map_err(|source| PipelineError::Spawn {
            step: step.to_string(),
            program: self.program.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(PipelineError::CommandFailed {
                step: step.to_string(),
                command: self.to_string(),
                status: describe_status(status),
            })
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        if let Some(path) = &self.stdout {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}
