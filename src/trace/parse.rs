use crate::error::{MalformedTrace, TraceError};
use crate::trace::Trace;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read and deserialize a trace file.
///
/// Only the document schema is checked here; entity consistency across events
/// is enforced by [`crate::model::reshape`].
pub fn load_trace_file(path: &Path) -> Result<Trace, TraceError> {
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read trace file");

    let trace = parse_trace_str(&text)?;
    debug!(events = trace.events.len(), "parsed trace");
    Ok(trace)
}

/// Deserialize a trace document from a JSON string.
pub fn parse_trace_str(text: &str) -> Result<Trace, TraceError> {
    serde_json::from_str(text).map_err(|err| TraceError::Malformed(MalformedTrace::from(err)))
}
