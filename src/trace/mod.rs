//! Trace file loading: the on-disk JSON schema written by the simulator.

pub mod event;
pub mod parse;

pub use event::{FlowSample, LinkSample, Trace};
pub use parse::load_trace_file;
