//! Entry sources: where already-structured log entries come from.
//!
//! The analysis core never does I/O. These adapters sit on the ingestion
//! side and hand over fully materialized entries.

pub mod decode;
pub mod file;
pub mod http;

use crate::model::LogEntry;
use crate::utils::error::SourceError;

// Re-export main types
pub use decode::decode_entries;
pub use file::FileSource;
pub use http::HttpSource;

/// Anything that can produce the entries of one or more traces
pub trait EntrySource {
    /// Load all entries, in the order the source delivers them
    fn load(&self) -> Result<Vec<LogEntry>, SourceError>;

    /// Short description for log messages
    fn describe(&self) -> String;
}
