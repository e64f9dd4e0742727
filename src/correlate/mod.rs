//! Correlation of entries into traces.
//!
//! Picks the identifier that groups entries into one logical transaction
//! when the primary trace id is missing, and splits mixed collections by it.

pub mod resolver;

// Re-export main types and functions
pub use resolver::{
    correlation_key, partition_by_correlation, resolve_correlation, CorrelationKind,
    CorrelationRules,
};
