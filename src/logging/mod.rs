pub mod cleanup;
pub mod config;
pub mod middleware;
pub mod paths;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use config::LogConfig;
pub use middleware::{access_log_middleware, request_id_middleware, RequestId};

/// Keeps the non-blocking file writers alive; drop it only at shutdown
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

/// Initialize console plus JSON file logging for server mode
///
/// - Console: compact, filtered by `RUST_LOG` or the configured level
/// - `access.log`: JSON, only events with target `access_log`
/// - `application.log`: JSON, everything else
///
/// Files roll daily. The cleanup task is spawned on the current tokio runtime
/// when enabled.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.console_log_level)),
        );

    if !config.file_logging_enabled {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        return Ok(LoggingGuard {
            _guards: Vec::new(),
        });
    }

    let log_dir = paths::get_log_directory(config.custom_log_dir.as_deref())?;

    let access_appender = tracing_appender::rolling::daily(&log_dir, "access.log");
    let app_appender = tracing_appender::rolling::daily(&log_dir, "application.log");
    let (access_writer, access_guard) = tracing_appender::non_blocking(access_appender);
    let (app_writer, app_guard) = tracing_appender::non_blocking(app_appender);

    let access_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(access_writer)
        .with_filter(EnvFilter::new("access_log=info"));

    let app_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(app_writer)
        .with_filter(
            EnvFilter::new(&config.file_log_level).add_directive("access_log=off".parse()?),
        );

    tracing_subscriber::registry()
        .with(console_layer)
        .with(access_layer)
        .with(app_layer)
        .try_init()?;

    tracing::info!(log_dir = ?log_dir, "Logging initialized");

    if config.enable_cleanup {
        tokio::spawn(cleanup::cleanup_task(log_dir, config.clone()));
        tracing::info!(
            retention_days = config.retention_days,
            max_total_size_mb = config.max_total_size_mb,
            "Log cleanup task started"
        );
    }

    Ok(LoggingGuard {
        _guards: vec![access_guard, app_guard],
    })
}

/// Console-only logging to stderr, keeping stdout free for command output
pub fn init_cli_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .try_init();
}

/// Log platform-specific information on startup
pub fn log_platform_info() {
    tracing::info!(
        platform = std::env::consts::OS,
        architecture = std::env::consts::ARCH,
        version = env!("CARGO_PKG_VERSION"),
        "fintext starting"
    );
}
