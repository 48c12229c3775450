//! Environment variable names read by [`TeavetConfig::from_env`].
//!
//! These are purely helpers; [`TeavetConfig`] itself stays a plain value
//! that can be built without touching the environment.
//!
//! [`TeavetConfig`]: crate::config::TeavetConfig
//! [`TeavetConfig::from_env`]: crate::config::TeavetConfig::from_env

/// Directory holding `teavet.log`. Unset means the working directory.
pub const TEAVET_LOG_DIR_ENV: &str = "TEAVET_LOG_DIR";

/// Record layout: `pretty` or `lines`.
pub const TEAVET_FORMAT_ENV: &str = "TEAVET_FORMAT";

/// Console target: `stderr`, `stdout` or `off`.
pub const TEAVET_CONSOLE_ENV: &str = "TEAVET_CONSOLE";

/// Create the log file on first write instead of requiring `start()`.
pub const TEAVET_CREATE_LOG_ENV: &str = "TEAVET_CREATE_LOG";

/// Any value disables ANSI colors (see <https://no-color.org>).
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a boolean flag; `1`, `true`, `yes` and `on` count as set.
pub fn env_flag(key: &str) -> bool {
    matches!(
        env_or(key, "").trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
