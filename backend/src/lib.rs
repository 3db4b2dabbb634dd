pub mod auth;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use db::connection::get_db_pool;
pub use error::{AppError, AppResult};
pub use router::create_router;
pub use state::AppState;
pub use utils::config::Config;

// Re-export common types
pub use anyhow::Result;
pub use chrono::{DateTime, Utc};
pub use sqlx::PgPool;
pub use uuid::Uuid;
