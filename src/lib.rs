//! AR Trace Studio
//!
//! Span-tree reconstruction and critical-path analysis for the logs of a
//! transactional business-rule engine.
//!
//! Given the flat, time-ordered entries captured during one execution
//! (API calls, SQL statements, filter steps, escalations), the library
//! rebuilds the causal call tree, picks the critical path explaining the
//! end-to-end duration and derives summary statistics.
//!
//! ## Getting Started
//!
//! ```no_run
//! use ar_trace_studio::analysis::analyze_trace;
//! use ar_trace_studio::source::{EntrySource, FileSource};
//! use ar_trace_studio::utils::AnalysisConfig;
//!
//! let entries = FileSource::new("entries.json").load()?;
//! let analysis = analyze_trace(&entries, &AnalysisConfig::default());
//! println!("critical path: {:?}", analysis.critical_path);
//! # Ok::<(), ar_trace_studio::utils::SourceError>(())
//! ```

pub mod aggregator;
pub mod analysis;
pub mod commands;
pub mod correlate;
pub mod model;
pub mod output;
pub mod source;
pub mod utils;
