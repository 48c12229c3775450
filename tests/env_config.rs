use std::path::PathBuf;

use teavet::env::{
    NO_COLOR_ENV, TEAVET_CONSOLE_ENV, TEAVET_CREATE_LOG_ENV, TEAVET_FORMAT_ENV, TEAVET_LOG_DIR_ENV,
};
use teavet::{ConsoleTarget, RecordFormat, TeavetConfig};

// Environment variables are process-wide; one test owns them.
#[test]
fn config_reads_overrides_and_ignores_unknown_values() {
    std::env::set_var(TEAVET_LOG_DIR_ENV, "/var/log/teavet");
    std::env::set_var(TEAVET_FORMAT_ENV, "lines");
    std::env::set_var(TEAVET_CONSOLE_ENV, "stdout");
    std::env::set_var(TEAVET_CREATE_LOG_ENV, "yes");
    std::env::set_var(NO_COLOR_ENV, "1");

    let config = TeavetConfig::from_env();
    assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/teavet")));
    assert_eq!(config.format, RecordFormat::Lines);
    assert_eq!(config.console, ConsoleTarget::Stdout);
    assert!(config.create_if_missing);
    assert!(!config.colors);

    std::env::set_var(TEAVET_FORMAT_ENV, "yaml");
    std::env::set_var(TEAVET_CONSOLE_ENV, "printer");
    std::env::set_var(TEAVET_CREATE_LOG_ENV, "nope");
    std::env::remove_var(TEAVET_LOG_DIR_ENV);
    std::env::remove_var(NO_COLOR_ENV);

    let config = TeavetConfig::from_env();
    assert_eq!(config, TeavetConfig::default());
}
