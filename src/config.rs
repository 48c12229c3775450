use std::path::PathBuf;

use crate::console::ConsoleTarget;
use crate::env::{
    env_flag, env_or, NO_COLOR_ENV, TEAVET_CONSOLE_ENV, TEAVET_CREATE_LOG_ENV, TEAVET_FORMAT_ENV,
    TEAVET_LOG_DIR_ENV,
};
use crate::persist::RecordFormat;

/// Logger configuration.
///
/// Built once and handed to [`Teavet::new`](crate::Teavet::new); the logger
/// never changes it afterwards.
///
/// **Fields**
/// - `log_dir`: directory holding `teavet.log`. `None` resolves the working
///   directory on every call.
/// - `format`: layout of records in the file.
/// - `create_if_missing`: create the file on first write. When `false` a
///   missing file is an error and `start()` has to run first.
/// - `console`: where the colored blocks are printed.
/// - `colors`: emit ANSI color sequences.
/// - `show_all_fields`: print every present optional field instead of only
///   the highest-precedence one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeavetConfig {
    pub log_dir: Option<PathBuf>,
    pub format: RecordFormat,
    pub create_if_missing: bool,
    pub console: ConsoleTarget,
    pub colors: bool,
    pub show_all_fields: bool,
}

impl Default for TeavetConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            format: RecordFormat::Pretty,
            create_if_missing: false,
            console: ConsoleTarget::Stderr,
            colors: true,
            show_all_fields: false,
        }
    }
}

impl TeavetConfig {
    /// Defaults overridden by whatever `TEAVET_*` / `NO_COLOR` variables are
    /// set. Unrecognized values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_dir = std::env::var_os(TEAVET_LOG_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        let format = RecordFormat::parse(&env_or(TEAVET_FORMAT_ENV, "")).unwrap_or(defaults.format);
        let console =
            ConsoleTarget::parse(&env_or(TEAVET_CONSOLE_ENV, "")).unwrap_or(defaults.console);

        Self {
            log_dir,
            format,
            create_if_missing: env_flag(TEAVET_CREATE_LOG_ENV),
            console,
            colors: std::env::var_os(NO_COLOR_ENV).is_none(),
            show_all_fields: defaults.show_all_fields,
        }
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}
