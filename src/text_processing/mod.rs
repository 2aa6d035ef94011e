pub mod amount;
pub mod cleaner;
pub mod currency;
pub mod entities;
pub mod preprocessing;
pub mod rewriter;
pub mod sanitizer;

pub use cleaner::{clean, FinancialTextCleaner, Table};
pub use rewriter::{CurrencyRewriter, RewriterOptions};
