pub mod config;
pub mod data;
pub mod db;
pub mod features;
pub mod handlers;
pub mod schema;
pub mod utils;

pub use db::DbPool;
