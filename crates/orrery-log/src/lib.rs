//! Tracing subscriber setup.
//!
//! Console output is human readable with an uptime timer. Debug builds also
//! write JSON lines to `orrery.log` in the platform log directory.

use orrery_config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config name one.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "orrery.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `config.debug.log_level`, which wins over
/// [`DEFAULT_FILTER`]. Returns the log file path when file logging is active.
/// Calling this twice panics inside `tracing_subscriber`, so call it once
/// from `main`.
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let configured = config.map(|c| c.debug.log_level.as_str()).unwrap_or("");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(configured));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some((log_file, log_path)) = open_log_file(log_dir)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return Some(log_path);
    }

    subscriber.init();
    None
}

/// Creates `log_dir` if needed and truncates [`LOG_FILE_NAME`] inside it.
/// Returns `None` when either step fails, which disables file logging.
fn open_log_file(log_dir: &Path) -> Option<(std::fs::File, PathBuf)> {
    std::fs::create_dir_all(log_dir).ok()?;
    let path = log_dir.join(LOG_FILE_NAME);
    let file = std::fs::File::create(&path).ok()?;
    Some((file, path))
}

/// Parses a configured filter string, falling back to [`DEFAULT_FILTER`]
/// when it is blank or malformed.
pub fn filter_for(configured: &str) -> EnvFilter {
    let configured = configured.trim();
    if configured.is_empty() {
        return EnvFilter::new(DEFAULT_FILTER);
    }
    EnvFilter::try_new(configured).unwrap_or_else(|err| {
        eprintln!("invalid log filter {configured:?} ({err}), using {DEFAULT_FILTER:?}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}
