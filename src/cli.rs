/// CLI argument parsing and help text
use std::path::PathBuf;

use crate::config::constants::DEFAULT_PORT;
use crate::error::{FintextError, Result};

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Server { port: u16 },
    /// Clean text from argv, or stdin when `text` is `None`
    Clean { text: Option<String> },
    Entities { text: Option<String> },
    Preprocess { text: Option<String> },
    Table { path: PathBuf, columns: Vec<String> },
}

/// Parse arguments, excluding the program name
pub fn parse_args(args: &[String]) -> Result<Command> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        return Ok(Command::Help);
    }
    if args.iter().any(|a| a == "-v" || a == "--version") {
        return Ok(Command::Version);
    }

    let mut server = false;
    let mut port = DEFAULT_PORT;
    let mut entities = false;
    let mut preprocess = false;
    let mut table: Option<PathBuf> = None;
    let mut columns: Vec<String> = Vec::new();
    let mut words: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--server" => server = true,
            "--entities" => entities = true,
            "--preprocess" => preprocess = true,
            "--port" => {
                let value = iter.next().ok_or_else(|| missing_value("--port"))?;
                port = value.parse().map_err(|_| {
                    FintextError::InvalidRequest(format!("Invalid port: {}", value))
                })?;
            }
            "--table" => {
                let value = iter.next().ok_or_else(|| missing_value("--table"))?;
                table = Some(PathBuf::from(value));
            }
            "--columns" => {
                let value = iter.next().ok_or_else(|| missing_value("--columns"))?;
                columns = value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect();
            }
            flag if flag.starts_with("--") => {
                return Err(FintextError::InvalidRequest(format!(
                    "Unknown option: {}",
                    flag
                )))
            }
            word => words.push(word),
        }
    }

    if server {
        return Ok(Command::Server { port });
    }

    if let Some(path) = table {
        if columns.is_empty() {
            return Err(FintextError::InvalidRequest(
                "--table requires --columns a,b,...".to_string(),
            ));
        }
        return Ok(Command::Table { path, columns });
    }

    let text = if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    };

    Ok(if entities {
        Command::Entities { text }
    } else if preprocess {
        Command::Preprocess { text }
    } else {
        Command::Clean { text }
    })
}

fn missing_value(flag: &str) -> FintextError {
    FintextError::InvalidRequest(format!("{} requires a value", flag))
}

pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!("fintext v{}", version);
    println!("Financial text normalization and currency rewriting");
    println!();
    println!("USAGE:");
    println!("    fintext [OPTIONS] [TEXT...]");
    println!();
    println!("OPTIONS:");
    println!("    --entities              Extract financial entities instead of cleaning");
    println!("    --preprocess            Tokenize, drop stopwords and lemmatize");
    println!("    --table <FILE>          Clean a JSON table file");
    println!("    --columns <a,b,...>     Columns of the table to clean");
    println!("    --server                Start HTTP server mode");
    println!("    --port <PORT>           Server port (default: {})", DEFAULT_PORT);
    println!("    -h, --help              Print this help message");
    println!("    -v, --version           Print version information");
    println!();
    println!("Without TEXT, input is read from stdin.");
    println!();
    println!("EXAMPLES:");
    println!("    fintext \"Price: \\$5K for the item\"");
    println!("    echo 'Cost is 2K-5K' | fintext");
    println!("    fintext --table posts.json --columns title,body");
    println!("    fintext --server --port 8080");
    println!();
    println!("SERVER ENDPOINTS:");
    println!("    POST   /clean         - Clean one text");
    println!("    POST   /clean/batch   - Clean named columns of a table");
    println!("    POST   /preprocess    - Tokens for NLP");
    println!("    POST   /entities      - Financial entity mentions");
    println!("    POST   /frequencies   - Word counts and chart data");
    println!("    POST   /compare       - Word counts across two corpora");
    println!("    GET    /health        - Health check");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    FINTEXT_ISO_SUFFIX_PASS          - Also rewrite amounts like '5K USD' (default: false)");
    println!("    FINTEXT_API_KEY_FILE             - Path to API keys file");
    println!("    FINTEXT_LOG_DIR                  - Log directory for server mode");
    println!(
        "    RATE_LIMIT_MODE                  - Rate limit mode (auto/per-key/per-ip/disabled)"
    );
    println!("    REQUEST_TIMEOUT_SECONDS          - Request timeout in seconds (default: 30)");
    println!("    RUST_LOG                         - Log level (error/warn/info/debug/trace)");
    println!();
    println!("Settings are also read from a .env file in the working directory.");
}

pub fn print_version() {
    println!("fintext v{}", env!("CARGO_PKG_VERSION"));
}
