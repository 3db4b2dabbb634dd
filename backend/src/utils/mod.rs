pub mod config;
pub mod logging;
pub mod rate_limit;

pub use config::Config;
pub use logging::init_logging;
pub use rate_limit::{RateLimiter, client_ip};
