// src/error.rs
// Error type shared by every stage of the pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Errors that halt the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required input file is absent or not a regular file
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The output prefix cannot be used as a file stem
    #[error("invalid output prefix '{0}': must be non-empty and contain no path separator")]
    InvalidPrefix(String),

    /// An external program could not be located
    #[error("missing required tool: {tool}")]
    MissingTool { tool: String },

    /// The operating system refused to start an external program
    #[error("failed to start '{program}' for step {step}: {source}")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program exited unsuccessfully
    #[error("step {step} failed ({status}): {command}")]
    CommandFailed {
        step: String,
        command: String,
        status: String,
    },

    /// A step reported success but did not leave its output behind
    #[error("step {step} did not produce {}", .path.display())]
    MissingOutput { step: String, path: PathBuf },

    /// Filesystem error outside of tool execution
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A line of the depth table could not be read
    #[error("malformed depth line {line}: {reason}")]
    DepthParse { line: usize, reason: String },

    /// Rendering the coverage plot failed
    #[error("plotting failed: {0}")]
    Plot(String),
}

impl PipelineError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
