//! CLI error types with exit code handling

use miette::Diagnostic;
use relocate_core::{RelocateError, Stage};
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The chart path or output path is unusable
    #[error("{message}")]
    #[diagnostic(code(relocate::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The chart archive or its values.yaml could not be processed
    #[error("Chart error at {stage}: {message}")]
    #[diagnostic(code(relocate::cli::chart))]
    Chart {
        stage: Stage,
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error while producing the output
    #[error("IO error at {stage}: {message}")]
    #[diagnostic(code(relocate::cli::io))]
    Io { stage: Stage, message: String },

    /// Internal error (unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(relocate::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Chart { .. } => exit_codes::CHART_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an input error (user provided invalid paths)
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<RelocateError> for CliError {
    fn from(err: RelocateError) -> Self {
        let stage = err.stage();
        let message = err.to_string();

        match &err {
            RelocateError::SourceOpen { .. } | RelocateError::EntryRead { .. } => CliError::Chart {
                stage,
                message,
                help: Some("Expecting a gzipped chart tarball, as produced by `helm package`".into()),
            },
            RelocateError::Decode { .. } => CliError::Chart {
                stage,
                message,
                help: Some("The chart's values.yaml must be a valid YAML mapping".into()),
            },
            RelocateError::GlobalNotMapping { .. } => CliError::Chart {
                stage,
                message,
                help: Some("Declare `global` as a mapping, e.g. `global: {}`".into()),
            },
            RelocateError::SinkCreate { .. } | RelocateError::EntryWrite { .. } => {
                CliError::Io { stage, message }
            }
            RelocateError::Encode { .. } => CliError::Internal { message },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
