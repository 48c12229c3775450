use std::fs;

use teavet::persist::last_record;
use teavet::{Teavet, TeavetConfig, TeavetError};

// The working directory is process-wide, so everything that depends on it
// lives in this single test.
#[test]
fn log_file_lives_in_the_working_directory() {
    let _ = teavet::install(Teavet::new(TeavetConfig::default()));
    let dir = tempfile::tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let expected = std::env::current_dir().unwrap().join("teavet.log");

    assert!(matches!(
        teavet::locate_log_file(),
        Err(TeavetError::FileNotFound(_))
    ));

    assert_eq!(teavet::start(), expected);
    assert_eq!(teavet::locate_log_file().unwrap(), expected);

    teavet::complete("success", "Teavet is up and running!", None);
    teavet::error("connection refused");
    let written = fs::metadata(&expected).unwrap().len();
    assert!(written > 0);

    assert_eq!(teavet::ensure_log_file().unwrap(), expected);
    assert_eq!(fs::metadata(&expected).unwrap().len(), written);

    let records = teavet::read_records(&expected).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message(), Some("Teavet is up and running!"));
    assert!(records[0].filename().ends_with("working_dir.rs"));

    let last = last_record(&expected).unwrap().unwrap();
    assert_eq!(last.fault(), Some("connection refused"));

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);

    std::env::set_current_dir(env!("CARGO_MANIFEST_DIR")).unwrap();
}
