//! Logging setup: warnings to stderr, everything at `info` and above to a
//! daily-rolling file under the logs directory.
//!
//! `SIGCAT_DEBUG_LOG=1` switches both outputs to `debug`. Otherwise the file
//! honors `RUST_LOG`.

use std::env;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

pub const DEBUG_ENV: &str = "SIGCAT_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "sigcat.log";

fn debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

fn file_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
///
/// If the logs directory cannot be created only stderr logging is set up.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    let debug = debug_enabled();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(if debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        });

    let (file_layer, guard) = match fs_err::create_dir_all(logs_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(file_filter(debug));
            (Some(layer), Some(guard))
        }
        Err(err) => {
            eprintln!("sigcat: file logging disabled: {}", err);
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
