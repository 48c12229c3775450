//! Process-wide logging functions.
//!
//! These share one [`Teavet`] (installed with [`install`], otherwise built
//! from the environment on first use) and keep the classic semantics: a
//! record that cannot be saved ends the process with status 1, and fatal or
//! panic records are enforced after printing. Use a [`Teavet`] value
//! directly to handle those cases yourself.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::Result;
use crate::logger::{Logged, Teavet};

static DEFAULT: OnceLock<Teavet> = OnceLock::new();

/// Install the logger used by the free functions.
///
/// Returns the logger back if one is already in place, either installed
/// earlier or created lazily by a previous call.
pub fn install(logger: Teavet) -> std::result::Result<(), Teavet> {
    DEFAULT.set(logger)
}

/// The shared logger, built from the environment if none was installed.
pub fn default_logger() -> &'static Teavet {
    DEFAULT.get_or_init(Teavet::from_env)
}

/// Create the log file for the shared logger. Exits on failure.
pub fn start() -> PathBuf {
    match default_logger().start() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("Unable to create log file: {}", err);
            std::process::exit(1);
        }
    }
}

#[track_caller]
pub fn simple() {
    conclude(default_logger().simple());
}

/// Logs `status`; exits for `fatal`, panics for `panic`.
#[track_caller]
pub fn status(status: &str) {
    conclude(default_logger().status(status));
}

#[track_caller]
pub fn message(message: &str) {
    conclude(default_logger().message(message));
}

#[track_caller]
pub fn error(fault: impl fmt::Display) {
    conclude(default_logger().error(fault));
}

/// Logs `fault` and exits with status 1.
#[track_caller]
pub fn fatal(fault: impl fmt::Display) {
    conclude(default_logger().fatal(fault));
}

/// Logs `fault` and panics with the rendered block.
#[track_caller]
pub fn panic(fault: impl fmt::Display) {
    conclude(default_logger().panic(fault));
}

#[track_caller]
pub fn complete(status: &str, message: &str, fault: Option<&dyn fmt::Display>) {
    conclude(default_logger().complete(status, message, fault));
}

fn conclude(result: Result<Logged>) {
    match result {
        Ok(logged) => logged.enforce(),
        Err(err) => {
            eprintln!("Unable to save log record to log file: {}", err);
            std::process::exit(1);
        }
    }
}
