use std::env;
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::time::Duration;

use fintext::auth::load_api_keys;
use fintext::cli::{self, Command};
use fintext::config::ServiceConfig;
use fintext::error::Result;
use fintext::logging::{self, LogConfig};
use fintext::server::{create_router, AppState};
use fintext::text_processing::entities::extract_entities;
use fintext::text_processing::preprocessing::{preprocess, PreprocessOptions};
use fintext::text_processing::{FinancialTextCleaner, Table};

#[tokio::main]
async fn main() {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().skip(1).collect();

    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    let result = match command {
        Command::Help => {
            cli::print_help();
            Ok(())
        }
        Command::Version => {
            cli::print_version();
            Ok(())
        }
        Command::Server { port } => run_server(port).await,
        other => {
            logging::init_cli_logging("fintext=warn");
            run_cli(other)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run_server(port: u16) -> Result<()> {
    let log_config = LogConfig::from_env();
    let _log_guard = match logging::init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging unavailable ({}), using console only", e);
            logging::init_cli_logging(&log_config.console_log_level);
            None
        }
    };
    logging::log_platform_info();

    let config = ServiceConfig::from_env();
    let api_keys = load_api_keys(config.api_key_file.as_deref());

    let mut state = AppState::new(&config, api_keys);
    state.slow_request_threshold = Duration::from_millis(log_config.slow_request_threshold_ms);

    if state.api_keys.is_enabled() {
        tracing::info!(keys = state.api_keys.count(), "Authentication enabled");
    } else {
        tracing::warn!("Authentication disabled (no key file found)");
    }
    match &state.rate_limiter {
        Some(limiter) => tracing::info!(
            mode = limiter.mode_description(),
            per_second = limiter.config().per_second,
            burst_size = limiter.config().burst_size,
            "Rate limiting enabled"
        ),
        None => tracing::warn!("Rate limiting disabled; server is unprotected from abuse"),
    }
    tracing::info!(
        timeout_secs = state.request_timeout.as_secs(),
        iso_suffix_pass = config.rewriter.iso_suffix_pass,
        "Service configured"
    );

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    let app = create_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn run_cli(command: Command) -> Result<()> {
    let config = ServiceConfig::from_env();
    let cleaner = FinancialTextCleaner::new(config.rewriter);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Clean { text } => {
            for line in input_lines(text)? {
                writeln!(out, "{}", cleaner.clean(&line))?;
            }
        }
        Command::Entities { text } => {
            for line in input_lines(text)? {
                for entity in extract_entities(&line) {
                    writeln!(out, "{}\t{}", entity.kind, entity.text)?;
                }
            }
        }
        Command::Preprocess { text } => {
            let options = PreprocessOptions::default();
            for line in input_lines(text)? {
                writeln!(out, "{}", preprocess(&line, &options))?;
            }
        }
        Command::Table { path, columns } => {
            let raw = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    fintext::error::FintextError::FileNotFound(path.display().to_string())
                }
                _ => e.into(),
            })?;
            let table: Table = serde_json::from_str(&raw)?;
            let cleaned = cleaner.clean_columns(table, &columns);
            writeln!(out, "{}", serde_json::to_string_pretty(&cleaned)?)?;
        }
        Command::Help | Command::Version | Command::Server { .. } => {}
    }

    Ok(())
}

/// The argv text as one line, or every stdin line
fn input_lines(text: Option<String>) -> Result<Vec<String>> {
    match text {
        Some(text) => Ok(vec![text]),
        None => {
            let stdin = io::stdin();
            let lines = stdin.lock().lines().collect::<io::Result<Vec<_>>>()?;
            Ok(lines)
        }
    }
}
