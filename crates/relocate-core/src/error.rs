//! Core error types
//!
//! Every failure aborts the whole relocation. The variants follow the
//! pipeline stages so callers can report where things went wrong.

use std::fmt;
use thiserror::Error;

/// Pipeline stage at which a relocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Opening the compressed input or its container framing
    SourceOpen,
    /// Creating or preparing the output sink
    SinkCreate,
    /// Reading an entry header or body from the input
    EntryRead,
    /// Decoding the values document
    Decode,
    /// Encoding the rewritten values document
    Encode,
    /// Writing an entry or finalizing the output
    EntryWrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SourceOpen => "source-open",
            Stage::SinkCreate => "sink-create",
            Stage::EntryRead => "entry-read",
            Stage::Decode => "decode",
            Stage::Encode => "encode",
            Stage::EntryWrite => "entry-write",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("Failed to open chart archive: {source}")]
    SourceOpen {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output archive: {source}")]
    SinkCreate {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read archive entry{}: {source}", display_path(.path))]
    EntryRead {
        path: Option<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid {path}: `global` must be a mapping, found {found}")]
    GlobalNotMapping { path: String, found: &'static str },

    #[error("Failed to serialize {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write archive entry{}: {source}", display_path(.path))]
    EntryWrite {
        path: Option<String>,
        #[source]
        source: std::io::Error,
    },
}

impl RelocateError {
    /// The pipeline stage this error came from
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            RelocateError::SourceOpen { .. } => Stage::SourceOpen,
            RelocateError::SinkCreate { .. } => Stage::SinkCreate,
            RelocateError::EntryRead { .. } => Stage::EntryRead,
            RelocateError::Decode { .. } | RelocateError::GlobalNotMapping { .. } => Stage::Decode,
            RelocateError::Encode { .. } => Stage::Encode,
            RelocateError::EntryWrite { .. } => Stage::EntryWrite,
        }
    }

    pub(crate) fn read(path: Option<&str>, source: std::io::Error) -> Self {
        Self::EntryRead {
            path: path.map(str::to_string),
            source,
        }
    }

    pub(crate) fn write(path: Option<&str>, source: std::io::Error) -> Self {
        Self::EntryWrite {
            path: path.map(str::to_string),
            source,
        }
    }
}

fn display_path(path: &Option<String>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, RelocateError>;
