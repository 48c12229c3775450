use chrono::{DateTime, FixedOffset, Local, SubsecRound};
use serde::{Deserialize, Serialize};
use std::panic::Location;

use crate::console::Color;
use crate::logger::Outcome;

/// One log entry: where it was logged, when, and what was said.
///
/// Records are immutable once built. The builder methods take `self` by
/// value and an empty string passed to any of them leaves the field absent,
/// so `None` is the only representation of "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StoredRecord", from = "StoredRecord")]
pub struct LogRecord {
    filename: String,
    line: u32,
    timestamp: DateTime<FixedOffset>,
    status: Option<String>,
    message: Option<String>,
    fault: Option<String>,
}

impl LogRecord {
    /// Start a record for an explicit source location, stamped with the
    /// current local time truncated to whole seconds.
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
            timestamp: Local::now().fixed_offset().trunc_subsecs(0),
            status: None,
            message: None,
            fault: None,
        }
    }

    /// Start a record for the caller's source location.
    ///
    /// Propagates through other `#[track_caller]` functions, so the facade
    /// entry points record the line that called them rather than their own.
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self::new(absolute_source_path(location.file()), location.line())
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = non_empty(status.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = non_empty(message.into());
        self
    }

    pub fn with_fault(mut self, fault: impl Into<String>) -> Self {
        self.fault = non_empty(fault.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Classification of the status label; `Status::Other` when unset.
    pub fn severity(&self) -> Status {
        self.status().map(Status::classify).unwrap_or(Status::Other)
    }

    /// The single optional field the console shows for this record.
    ///
    /// Status wins over message, message over fault. Fields that lose are
    /// still persisted.
    pub fn highlight(&self) -> Highlight<'_> {
        match (self.status(), self.message(), self.fault()) {
            (Some(status), _, _) => Highlight::Status(status),
            (None, Some(message), _) => Highlight::Message(message),
            (None, None, Some(fault)) => Highlight::Fault(fault),
            (None, None, None) => Highlight::Bare,
        }
    }
}

/// See [`LogRecord::highlight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight<'a> {
    Status(&'a str),
    Message(&'a str),
    Fault(&'a str),
    Bare,
}

/// Known status labels. Anything else, including no status, is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Info,
    Error,
    Warning,
    Fatal,
    Panic,
    Other,
}

impl Status {
    /// ASCII case-insensitive match on the label.
    pub fn classify(label: &str) -> Self {
        let lower = label.trim().to_ascii_lowercase();
        match lower.as_str() {
            "success" => Status::Success,
            "info" => Status::Info,
            "error" => Status::Error,
            "warning" | "warn" => Status::Warning,
            "fatal" => Status::Fatal,
            "panic" => Status::Panic,
            _ => Status::Other,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Status::Success => Color::Green,
            Status::Info => Color::Blue,
            Status::Error | Status::Warning => Color::Yellow,
            Status::Fatal => Color::Magenta,
            Status::Panic => Color::Red,
            Status::Other => Color::Cyan,
        }
    }

    pub fn outcome(self) -> Outcome {
        match self {
            Status::Fatal => Outcome::Exit,
            Status::Panic => Outcome::Panic,
            _ => Outcome::Continue,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Compiler-reported source paths are usually relative; anchor them at the
/// working directory. Falls back to the raw path if that fails.
pub(crate) fn absolute_source_path(file: &str) -> String {
    std::path::absolute(file)
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| file.to_string())
}

/// On-disk shape of a [`LogRecord`].
///
/// Each optional field lives in its own wrapper object which is omitted
/// entirely when the field is absent. Files written by older writers carry
/// empty wrappers (`"logger_status": {}`); those decode as absent.
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    filename: String,
    #[serde(with = "line_text")]
    line: u32,
    #[serde(with = "rfc3339_secs")]
    timestamp: DateTime<FixedOffset>,
    #[serde(rename = "logger_status", default, skip_serializing_if = "Option::is_none")]
    status: Option<StatusField>,
    #[serde(rename = "logger_message", default, skip_serializing_if = "Option::is_none")]
    message: Option<MessageField>,
    #[serde(rename = "logger_fault", default, skip_serializing_if = "Option::is_none")]
    fault: Option<FaultField>,
}

#[derive(Serialize, Deserialize)]
struct StatusField {
    #[serde(default)]
    status: String,
}

#[derive(Serialize, Deserialize)]
struct MessageField {
    #[serde(default)]
    message: String,
}

#[derive(Serialize, Deserialize)]
struct FaultField {
    #[serde(default)]
    fault: String,
}

impl From<LogRecord> for StoredRecord {
    fn from(record: LogRecord) -> Self {
        StoredRecord {
            filename: record.filename,
            line: record.line,
            timestamp: record.timestamp,
            status: record.status.map(|status| StatusField { status }),
            message: record.message.map(|message| MessageField { message }),
            fault: record.fault.map(|fault| FaultField { fault }),
        }
    }
}

impl From<StoredRecord> for LogRecord {
    fn from(stored: StoredRecord) -> Self {
        LogRecord {
            filename: stored.filename,
            line: stored.line,
            timestamp: stored.timestamp,
            status: stored.status.and_then(|f| non_empty(f.status)),
            message: stored.message.and_then(|f| non_empty(f.message)),
            fault: stored.fault.and_then(|f| non_empty(f.fault)),
        }
    }
}

// The line number is written as text.
mod line_text {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(line: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(line)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

mod rfc3339_secs {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        timestamp: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text).map_err(D::Error::custom)
    }
}
