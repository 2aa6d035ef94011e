pub mod constants;
pub mod service;

pub use service::{RateLimitSetting, ServiceConfig};
