// Library modules, shared by the binary and integration tests
pub mod analysis;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod text_processing;
pub mod utils;

pub use error::{FintextError, Result};
pub use text_processing::{clean, FinancialTextCleaner, RewriterOptions, Table};
