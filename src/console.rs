use chrono::SecondsFormat;
use colored::Colorize;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::record::{Highlight, LogRecord};

/// Colors used for console blocks. Blocks are also bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

impl From<Color> for colored::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Red => colored::Color::Red,
            Color::Green => colored::Color::Green,
            Color::Yellow => colored::Color::Yellow,
            Color::Blue => colored::Color::Blue,
            Color::Magenta => colored::Color::Magenta,
            Color::Cyan => colored::Color::Cyan,
        }
    }
}

/// Where console blocks go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
    Off,
}

impl ConsoleTarget {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "stderr" => Some(ConsoleTarget::Stderr),
            "stdout" => Some(ConsoleTarget::Stdout),
            "off" | "none" => Some(ConsoleTarget::Off),
            _ => None,
        }
    }
}

/// Render a record as a colored bordered block.
///
/// Only the field picked by [`LogRecord::highlight`] is shown next to the
/// filename, line and timestamp. Escape sequences are left out when
/// `colored` decides the terminal can't take them (e.g. `NO_COLOR`).
pub fn format_for_console(record: &LogRecord, color: Color) -> String {
    paint(render_block(record, false), color)
}

fn paint(block: String, color: Color) -> String {
    block.color(colored::Color::from(color)).bold().to_string()
}

fn render_block(record: &LogRecord, all_fields: bool) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "\n| Filename: {}\n| Line: {}\n| Timestamp: {}\n",
        record.filename(),
        record.line(),
        record.timestamp().to_rfc3339_opts(SecondsFormat::Secs, true),
    );

    if all_fields {
        if let Some(status) = record.status() {
            let _ = writeln!(out, "| Status: {}", status);
        }
        if let Some(message) = record.message() {
            let _ = writeln!(out, "| Message: {}", message);
        }
        if let Some(fault) = record.fault() {
            let _ = writeln!(out, "| Fault: {}", fault);
        }
    } else {
        match record.highlight() {
            Highlight::Status(status) => {
                let _ = writeln!(out, "| Status: {}", status);
            }
            Highlight::Message(message) => {
                let _ = writeln!(out, "| Message: {}", message);
            }
            Highlight::Fault(fault) => {
                let _ = writeln!(out, "| Fault: {}", fault);
            }
            Highlight::Bare => {}
        }
    }

    out
}

/// Console half of a logger, configured once at construction.
///
/// Holds the output stream behind a mutex so blocks from concurrent callers
/// come out whole.
pub struct ConsoleFormatter {
    colors: bool,
    show_all_fields: bool,
    writer: Option<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleFormatter {
    pub fn new(target: ConsoleTarget, colors: bool, show_all_fields: bool) -> Self {
        let writer: Option<Box<dyn Write + Send>> = match target {
            ConsoleTarget::Stderr => Some(Box::new(io::stderr())),
            ConsoleTarget::Stdout => Some(Box::new(io::stdout())),
            ConsoleTarget::Off => None,
        };
        Self {
            colors,
            show_all_fields,
            writer: writer.map(Mutex::new),
        }
    }

    /// Send console output to an arbitrary writer instead of a std stream.
    pub fn with_writer(writer: impl Write + Send + 'static, colors: bool, show_all_fields: bool) -> Self {
        Self {
            colors,
            show_all_fields,
            writer: Some(Mutex::new(Box::new(writer))),
        }
    }

    /// Render without printing. Colors are left out when disabled.
    pub fn render(&self, record: &LogRecord, color: Color) -> String {
        let block = render_block(record, self.show_all_fields);
        if self.colors {
            paint(block, color)
        } else {
            block
        }
    }

    /// Write one line of text followed by a newline. A no-op when the
    /// console is off.
    pub fn print(&self, text: &str) -> io::Result<()> {
        let Some(writer) = &self.writer else {
            return Ok(());
        };
        let mut writer = writer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "console writer poisoned"))?;
        writeln!(writer, "{}", text)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SharedBuf;
    use chrono::DateTime;

    fn record() -> LogRecord {
        LogRecord::new("/srv/app/src/main.rs", 9)
            .with_timestamp(DateTime::parse_from_rfc3339("2024-03-01T12:30:45Z").unwrap())
    }

    const BARE_BLOCK: &str =
        "\n| Filename: /srv/app/src/main.rs\n| Line: 9\n| Timestamp: 2024-03-01T12:30:45Z\n";

    #[test]
    fn bare_record_shows_location_and_time_only() {
        let text = format_for_console(&record(), Color::Cyan);

        assert_eq!(text, BARE_BLOCK.cyan().bold().to_string());
    }

    #[test]
    fn status_masks_message_and_fault() {
        let record = record()
            .with_status("success")
            .with_message("Teavet is up and running!")
            .with_fault("boom");

        let text = format_for_console(&record, Color::Green);

        let expected = format!("{}| Status: success\n", BARE_BLOCK);
        assert_eq!(text, expected.green().bold().to_string());
        assert!(!text.contains("Message"));
        assert!(!text.contains("Fault"));
    }

    #[test]
    fn message_shown_when_no_status() {
        let text = format_for_console(&record().with_message("hello").with_fault("boom"), Color::Cyan);
        assert!(text.contains("| Message: hello\n"));
        assert!(!text.contains("Fault"));
    }

    #[test]
    fn fault_shown_when_alone() {
        let text = format_for_console(&record().with_fault("connection reset"), Color::Yellow);
        assert!(text.contains("| Fault: connection reset\n"));
        assert!(!text.contains("Status"));
    }

    #[test]
    fn all_fields_mode_shows_every_present_field() {
        let formatter = ConsoleFormatter::new(ConsoleTarget::Off, true, true);
        let record = record().with_status("error").with_message("retrying").with_fault("timeout");

        let text = formatter.render(&record, Color::Yellow);

        assert!(text.contains("| Status: error\n| Message: retrying\n| Fault: timeout\n"));
    }

    #[test]
    fn colors_off_has_no_escape_sequences() {
        let formatter = ConsoleFormatter::new(ConsoleTarget::Off, false, false);
        let text = formatter.render(&record().with_status("panic"), Color::Red);

        assert_eq!(text, format!("{}| Status: panic\n", BARE_BLOCK));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn print_appends_newline_to_the_writer() {
        let buf = SharedBuf::default();
        let formatter = ConsoleFormatter::with_writer(buf.clone(), false, false);

        formatter.print("| Fault: boom").unwrap();

        assert_eq!(buf.contents(), "| Fault: boom\n");
    }

    #[test]
    fn console_target_names() {
        assert_eq!(ConsoleTarget::parse("STDOUT"), Some(ConsoleTarget::Stdout));
        assert_eq!(ConsoleTarget::parse("off"), Some(ConsoleTarget::Off));
        assert_eq!(ConsoleTarget::parse("tty"), None);
    }
}
