//! Configuration for the Dealflow workflow server.
//!
//! Both sections are read from environment variables with `envy`.

mod app;
mod database;

pub use app::AppConfig;
pub use database::DatabaseConfig;
