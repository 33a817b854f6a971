//! Postgres connection settings.
//!
//! Read from `POSTGRES_*` variables: `HOST`, `PORT`, `USER`, `PASSWORD`,
//! `DATABASE` and `SCHEMA`. Pool sizing uses `POSTGRES_POOL_MAX`,
//! `POSTGRES_POOL_MIN` and `POSTGRES_POOL_ACQUIRE_TIMEOUT_SECS`.

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Schema holding `workflows`, `workflow_executions`, `tasks` and the
    /// entity tables.
    pub schema: String,
    pub pool_max: u32,
    pub pool_min: u32,
    pub pool_acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "dealflow".to_string(),
            password: String::new(),
            database: "dealflow".to_string(),
            schema: "public".to_string(),
            pool_max: 10,
            pool_min: 1,
            pool_acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("POSTGRES_").from_env()
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    /// `user@host:port/database`, never including the password.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}
