pub mod catalog;
pub mod connection;
pub mod listings;
pub mod messages;
pub mod migrations;
pub mod offers;
pub mod profiles;
pub mod store;

pub use connection::{get_db_pool, DatabaseConfig};
pub use store::PgStore;
