pub mod client;
pub mod codec;
pub mod commands;
pub mod config;
pub mod connection;
pub mod console;
pub mod db;
pub mod dispatcher;
pub mod flat;
pub mod frame;
pub mod persistence;
pub mod record;
pub mod server;
pub mod store;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
