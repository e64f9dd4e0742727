//! Log entry records captured from one run of the rule engine.
//!
//! Entries arrive already structured (one record per logged operation);
//! turning raw log text into these records happens upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of logged operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogType {
    /// Client API call
    #[serde(rename = "API")]
    Api,

    /// SQL statement issued to the database
    #[serde(rename = "SQL")]
    Sql,

    /// Filter (workflow rule) step
    #[serde(rename = "FLTR", alias = "FILTER")]
    Filter,

    /// Escalation run
    #[serde(rename = "ESCL", alias = "ESCALATION")]
    Escalation,

    /// Anything else the engine logs
    #[serde(rename = "OTHER", other)]
    Other,
}

impl LogType {
    /// Short upper-case tag, as used in the log itself
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Api => "API",
            LogType::Sql => "SQL",
            LogType::Filter => "FLTR",
            LogType::Escalation => "ESCL",
            LogType::Other => "OTHER",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured log entry
///
/// Immutable input to the analysis core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique entry identifier (becomes the span id)
    #[serde(alias = "id")]
    pub entry_id: String,

    /// When the operation started
    pub timestamp: DateTime<Utc>,

    /// Operation kind
    #[serde(alias = "type")]
    pub log_type: LogType,

    /// Elapsed time of the operation
    #[serde(default, alias = "duration")]
    pub duration_ms: u64,

    /// Server thread that executed the operation
    #[serde(default)]
    pub thread_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_id: Option<String>,

    /// Nesting depth reported by filter entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_level: Option<u32>,

    #[serde(default)]
    pub api_code: String,

    #[serde(default)]
    pub form: String,

    #[serde(default)]
    pub sql_table: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub queue: String,

    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl LogEntry {
    /// Create an entry with the required fields; everything else empty
    #[must_use]
    pub fn new(
        entry_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        log_type: LogType,
        duration_ms: u64,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            timestamp,
            log_type,
            duration_ms,
            thread_id: thread_id.into(),
            trace_id: None,
            rpc_id: None,
            filter_level: None,
            api_code: String::new(),
            form: String::new(),
            sql_table: String::new(),
            user: String::new(),
            queue: String::new(),
            success: true,
            error_message: None,
        }
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    #[must_use]
    pub fn with_rpc_id(mut self, rpc_id: impl Into<String>) -> Self {
        self.rpc_id = Some(rpc_id.into());
        self
    }

    #[must_use]
    pub fn with_filter_level(mut self, level: u32) -> Self {
        self.filter_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = queue.into();
        self
    }

    /// Attach an error message; `success` is left untouched
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    /// Trace id, if present and not blank
    pub fn trace_key(&self) -> Option<&str> {
        non_blank(self.trace_id.as_deref())
    }

    /// RPC id, if present and not blank
    pub fn rpc_key(&self) -> Option<&str> {
        non_blank(self.rpc_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
