pub mod record;
pub mod error;
pub mod env;
pub mod config;
pub mod file;
pub mod persist;
pub mod console;
pub mod logger;
pub mod facade;

/// Target of this crate's own diagnostic events. The tracing bridge never
/// persists events with this target.
pub const DIAGNOSTICS_TARGET: &str = "teavet::diagnostics";

#[cfg(feature = "tracing-layer")]
pub mod layer;
#[cfg(feature = "tracing-layer")]
pub mod init;

pub use config::TeavetConfig;
pub use console::{format_for_console, Color, ConsoleFormatter, ConsoleTarget};
pub use error::TeavetError;
pub use facade::{complete, default_logger, error, fatal, install, message, panic, simple, start, status};
pub use file::{ensure_log_file, locate_log_file, LOG_FILE_NAME};
pub use logger::{Logged, Outcome, Teavet};
pub use persist::{append_record, read_records, read_records_partial, Appended, PartialRead, RecordFormat};
pub use record::{LogRecord, Status};
