use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TeavetError};

/// Fixed name of the log file inside the log directory.
pub const LOG_FILE_NAME: &str = "teavet.log";

/// Resolve the process working directory.
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(TeavetError::WorkingDirectory)
}

/// Create `<cwd>/teavet.log` if it does not exist yet and return its path.
///
/// Existing content is never truncated.
pub fn ensure_log_file() -> Result<PathBuf> {
    ensure_log_file_in(&working_dir()?)
}

/// Return `<cwd>/teavet.log` if it exists, [`TeavetError::FileNotFound`]
/// otherwise.
pub fn locate_log_file() -> Result<PathBuf> {
    locate_log_file_in(&working_dir()?)
}

/// [`ensure_log_file`] against an explicit directory.
pub fn ensure_log_file_in(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(LOG_FILE_NAME);

    // Opened only for its create side effect; the handle drops right away.
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| TeavetError::FileOpen {
            path: path.clone(),
            source,
        })?;

    debug!(target: crate::DIAGNOSTICS_TARGET, path = %path.display(), "log file ready");
    Ok(path)
}

/// [`locate_log_file`] against an explicit directory.
pub fn locate_log_file_in(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(LOG_FILE_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(TeavetError::FileNotFound(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_before_ensure_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        match locate_log_file_in(dir.path()) {
            Err(TeavetError::FileNotFound(path)) => {
                assert_eq!(path, dir.path().join(LOG_FILE_NAME))
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn ensure_creates_exactly_one_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = ensure_log_file_in(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("teavet.log"));
        assert!(path.is_file());

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(locate_log_file_in(dir.path()).unwrap(), path);
    }

    #[test]
    fn ensure_twice_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = ensure_log_file_in(dir.path()).unwrap();
        std::fs::write(&path, b"{\"line\": \"1\"}").unwrap();

        let again = ensure_log_file_in(dir.path()).unwrap();

        assert_eq!(again, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"{\"line\": \"1\"}");
    }

    #[test]
    fn ensure_in_missing_directory_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        assert!(matches!(
            ensure_log_file_in(&missing),
            Err(TeavetError::FileOpen { .. })
        ));
    }

    #[test]
    fn a_directory_named_like_the_log_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(LOG_FILE_NAME)).unwrap();

        assert!(matches!(
            locate_log_file_in(dir.path()),
            Err(TeavetError::FileNotFound(_))
        ));
    }
}
