mod bgg_client;
pub mod parsers;

pub use bgg_client::BggClient;
