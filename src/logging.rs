use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogLevel;

/// Environment variable holding a full `tracing` filter, e.g. `devnet_inspector=trace`
pub const LOG_FILTER_ENV: &str = "DEVNET_INSPECTOR_LOG";

/// Filter used when `DEVNET_INSPECTOR_LOG` is not set
pub fn default_filter(level: LogLevel) -> String {
    format!("devnet_inspector={}", level.as_filter_directive())
}

/// Initialize logging with structured output on stderr.
///
/// `DEVNET_INSPECTOR_LOG` wins when set; otherwise the filter follows `level`
/// (INFO when none is given).
pub fn init_logging(level: Option<LogLevel>) -> anyhow::Result<()> {
    let level = level.unwrap_or_default();
    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_level(true)
                .compact(),
        )
        .try_init()?;

    tracing::debug!(level = %level, "Structured logging initialized");
    Ok(())
}

/// Initialize logging for testing with reduced verbosity
pub fn init_test_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::new("devnet_inspector=debug");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer().compact())
        .try_init()
        .or_else(|_| Ok(())) // Ignore if already initialized
}
