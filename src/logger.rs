use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::config::TeavetConfig;
use crate::console::{Color, ConsoleFormatter};
use crate::error::Result;
use crate::file::{ensure_log_file_in, locate_log_file_in, working_dir};
use crate::persist::{append_record, Appended};
use crate::record::LogRecord;

/// Terminal severity of a logged record.
///
/// Logging never terminates the process by itself; the caller decides
/// whether to honor the outcome, e.g. through [`Logged::enforce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The record asks for the process to exit with status 1.
    Exit,
    /// The record asks for a panic carrying the rendered block.
    Panic,
}

/// Result of one logging call. A fatal or panic outcome has no effect
/// until [`Logged::enforce`] runs.
#[derive(Debug, Clone)]
pub struct Logged {
    pub record: LogRecord,
    /// The block as printed, escape sequences included.
    pub rendered: String,
    pub appended: Appended,
    pub outcome: Outcome,
}

impl Logged {
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Continue
    }

    /// Apply the outcome: return for `Continue`, exit with status 1 for
    /// `Exit`, panic with the rendered block for `Panic`.
    pub fn enforce(self) {
        match self.outcome {
            Outcome::Continue => {}
            Outcome::Exit => std::process::exit(1),
            Outcome::Panic => panic!("{}", self.rendered),
        }
    }
}

/// A configured logger: persists each record to `teavet.log`, then prints
/// it to the console.
///
/// Every logging method is `#[track_caller]`, so the record carries the
/// location of the code that called it.
pub struct Teavet {
    config: TeavetConfig,
    console: ConsoleFormatter,
}

impl Teavet {
    pub fn new(config: TeavetConfig) -> Self {
        let console = ConsoleFormatter::new(config.console, config.colors, config.show_all_fields);
        Self { config, console }
    }

    /// Logger built from [`TeavetConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(TeavetConfig::from_env())
    }

    /// Logger whose console output goes to `writer`; `config.console` is
    /// ignored.
    pub fn with_console_writer(config: TeavetConfig, writer: impl Write + Send + 'static) -> Self {
        let console = ConsoleFormatter::with_writer(writer, config.colors, config.show_all_fields);
        Self { config, console }
    }

    pub fn config(&self) -> &TeavetConfig {
        &self.config
    }

    /// Directory the log file lives in; the working directory unless
    /// configured otherwise.
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.config.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => working_dir(),
        }
    }

    /// Create the log file if needed and return its path.
    pub fn start(&self) -> Result<PathBuf> {
        ensure_log_file_in(&self.log_dir()?)
    }

    /// Path of the existing log file.
    pub fn log_file(&self) -> Result<PathBuf> {
        locate_log_file_in(&self.log_dir()?)
    }

    /// Append one record to the log file without printing it.
    pub fn persist(&self, record: &LogRecord) -> Result<Appended> {
        let dir = self.log_dir()?;
        let path = if self.config.create_if_missing {
            ensure_log_file_in(&dir)?
        } else {
            locate_log_file_in(&dir)?
        };
        append_record(&path, record, self.config.format)
    }

    /// Persist, then print in `color`. Nothing is printed if persisting
    /// fails.
    pub fn emit(&self, record: LogRecord, color: Color, outcome: Outcome) -> Result<Logged> {
        let appended = self.persist(&record)?;
        Ok(self.finish(record, appended, color, outcome))
    }

    /// Log the call site and time only.
    #[track_caller]
    pub fn simple(&self) -> Result<Logged> {
        self.emit(LogRecord::here(), Color::Cyan, Outcome::Continue)
    }

    /// Log a status label. `fatal` and `panic` produce terminal outcomes.
    #[track_caller]
    pub fn status(&self, status: &str) -> Result<Logged> {
        let record = LogRecord::here().with_status(status);
        let severity = record.severity();
        self.emit(record, severity.color(), severity.outcome())
    }

    #[track_caller]
    pub fn message(&self, message: &str) -> Result<Logged> {
        let record = LogRecord::here().with_message(message);
        self.emit(record, Color::Cyan, Outcome::Continue)
    }

    /// Log a fault. The raw fault text is printed on its own line ahead of
    /// the block.
    #[track_caller]
    pub fn error(&self, fault: impl fmt::Display) -> Result<Logged> {
        let record = LogRecord::here().with_fault(fault.to_string());
        let appended = self.persist(&record)?;
        if let Some(fault) = record.fault() {
            self.print(fault);
        }
        Ok(self.finish(record, appended, Color::Yellow, Outcome::Continue))
    }

    /// Log a fault with an [`Outcome::Exit`] outcome.
    #[track_caller]
    pub fn fatal(&self, fault: impl fmt::Display) -> Result<Logged> {
        let record = LogRecord::here().with_fault(fault.to_string());
        self.emit(record, Color::Magenta, Outcome::Exit)
    }

    /// Log a fault with an [`Outcome::Panic`] outcome.
    #[track_caller]
    pub fn panic(&self, fault: impl fmt::Display) -> Result<Logged> {
        let record = LogRecord::here().with_fault(fault.to_string());
        self.emit(record, Color::Red, Outcome::Panic)
    }

    /// Log status, message and fault together. Color and outcome follow the
    /// status; the console shows the status line only.
    #[track_caller]
    pub fn complete(
        &self,
        status: &str,
        message: &str,
        fault: Option<&dyn fmt::Display>,
    ) -> Result<Logged> {
        let mut record = LogRecord::here().with_status(status).with_message(message);
        if let Some(fault) = fault {
            record = record.with_fault(fault.to_string());
        }
        let severity = record.severity();
        self.emit(record, severity.color(), severity.outcome())
    }

    fn finish(&self, record: LogRecord, appended: Appended, color: Color, outcome: Outcome) -> Logged {
        let rendered = self.console.render(&record, color);
        self.print(&rendered);
        Logged {
            record,
            rendered,
            appended,
            outcome,
        }
    }

    fn print(&self, text: &str) {
        if let Err(e) = self.console.print(text) {
            debug!(target: crate::DIAGNOSTICS_TARGET, error = %e, "console write failed");
        }
    }
}
