use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::ops::Range;
use std::path::Path;

use tracing::trace;

use crate::error::{Result, TeavetError};
use crate::record::LogRecord;

/// How records are laid out in the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// One-space indented objects written back to back with no separator.
    /// The file as a whole is a stream of JSON values, not one document.
    #[default]
    Pretty,
    /// One compact object per line (newline-delimited JSON).
    Lines,
}

impl RecordFormat {
    /// Parse a format name as used in configuration (`pretty` / `lines`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(RecordFormat::Pretty),
            "lines" | "ndjson" | "jsonl" => Some(RecordFormat::Lines),
            _ => None,
        }
    }

    /// Serialize one record into the exact bytes that get appended.
    pub fn encode(self, record: &LogRecord) -> Result<Vec<u8>> {
        match self {
            RecordFormat::Pretty => {
                let mut buf = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(
                    &mut buf,
                    PrettyFormatter::with_indent(b" "),
                );
                record
                    .serialize(&mut serializer)
                    .map_err(TeavetError::Serialization)?;
                Ok(buf)
            }
            RecordFormat::Lines => {
                let mut buf = serde_json::to_vec(record).map_err(TeavetError::Serialization)?;
                buf.push(b'\n');
                Ok(buf)
            }
        }
    }
}

/// Byte range of the log file occupied by one appended record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
    /// File length observed right before the write. The range is only
    /// exact with a single writer: another process appending between the
    /// length check and the write shifts the real position.
    pub offset: u64,
    pub len: usize,
}

impl Appended {
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.len
    }
}

/// Append one record to an existing log file.
///
/// The file is opened, written with a single `write_all` and closed on every
/// path. No lock is taken: concurrent writers can interleave their bytes, and
/// with [`RecordFormat::Pretty`] that leaves the tail of the stream
/// unparseable. The returned [`Appended`] range is exact only when nothing
/// else appends to the file at the same time.
pub fn append_record(path: &Path, record: &LogRecord, format: RecordFormat) -> Result<Appended> {
    let bytes = format.encode(record)?;

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|source| TeavetError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

    let write_err = |source| TeavetError::Write {
        path: path.to_path_buf(),
        source,
    };
    let offset = file.metadata().map_err(write_err)?.len();
    file.write_all(&bytes).map_err(write_err)?;

    trace!(target: crate::DIAGNOSTICS_TARGET, path = %path.display(), offset, len = bytes.len(), "appended log record");
    Ok(Appended {
        offset,
        len: bytes.len(),
    })
}

/// Records read from a log file up to the first unparseable byte.
#[derive(Debug)]
pub struct PartialRead {
    /// Every record before the damage, in write order.
    pub records: Vec<LogRecord>,
    /// Why reading stopped early, if it did.
    pub error: Option<TeavetError>,
}

/// Parse every record in a log file, in write order.
///
/// Works for both formats since each is a plain stream of JSON objects.
/// Fails on the first damaged record; see [`read_records_partial`] to keep
/// what came before it.
pub fn read_records(path: &Path) -> Result<Vec<LogRecord>> {
    let read = read_records_partial(path)?;
    match read.error {
        Some(err) => Err(err),
        None => Ok(read.records),
    }
}

/// Like [`read_records`], but a damaged record (e.g. from interleaved
/// concurrent appends) ends the read instead of failing it.
///
/// Only a missing or unreadable file is an error.
pub fn read_records_partial(path: &Path) -> Result<PartialRead> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(TeavetError::FileNotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(TeavetError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut records = Vec::new();
    for parsed in serde_json::Deserializer::from_slice(&bytes).into_iter::<LogRecord>() {
        match parsed {
            Ok(record) => records.push(record),
            Err(source) => {
                return Ok(PartialRead {
                    records,
                    error: Some(TeavetError::Deserialization {
                        path: path.to_path_buf(),
                        source,
                    }),
                })
            }
        }
    }

    Ok(PartialRead {
        records,
        error: None,
    })
}

/// The most recently written record, if the file has any.
pub fn last_record(path: &Path) -> Result<Option<LogRecord>> {
    Ok(read_records(path)?.pop())
}
