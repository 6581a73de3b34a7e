pub mod connection;
pub mod games;
pub mod setup;
pub mod themes;
pub mod votes;

pub use connection::{create_pool, DbConn, DbPool};
