//! Typed errors for the two failure surfaces: the command line and the trace.
//!
//! Both are converted into `anyhow::Error` at the call site; `main` downcasts
//! to decide between the usage message and the plain error chain.

use std::path::PathBuf;

pub const USAGE: &str = "usage: netsim-trace-viz <file>.json";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}", USAGE)]
    MissingArgument,

    #[error("{}\n    input must be valid *.json file format", USAGE)]
    InvalidFileFormat,
}

/// Which side of an event a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Link,
    Flow,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Link => f.write_str("link"),
            EntityKind::Flow => f.write_str("flow"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("read trace file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed trace")]
    Malformed(#[from] MalformedTrace),

    #[error("trace contains no events")]
    Empty,
}

/// Structural problems in an otherwise readable trace document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedTrace {
    #[error("{message} at line {line} column {column}")]
    Schema {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("event {event}: {kind} '{id}' was not present in the first event")]
    UnknownEntity {
        event: usize,
        kind: EntityKind,
        id: String,
    },

    #[error("event {event}: {kind} '{id}' is reported more than once")]
    DuplicateEntity {
        event: usize,
        kind: EntityKind,
        id: String,
    },

    #[error("event {event}: {kind} '{id}' has no sample")]
    MissingEntity {
        event: usize,
        kind: EntityKind,
        id: String,
    },
}

impl From<serde_json::Error> for MalformedTrace {
    fn from(err: serde_json::Error) -> Self {
        // serde_json appends the position to its message; keep it separate.
        let full = err.to_string();
        let suffix = format!(" at line {} column {}", err.line(), err.column());
        MalformedTrace::Schema {
            message: full.strip_suffix(&suffix).unwrap_or(&full).to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}
