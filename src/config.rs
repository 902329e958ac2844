use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::db::Database;

/// Server settings, from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, global = true, env = "SESSION_FEEDBACK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the HTTP API
    #[arg(short, long, global = true, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "SESSION_FEEDBACK_DB")]
    pub database: Option<PathBuf>,

    /// Keep all data in memory; nothing survives a restart
    #[arg(long, global = true, conflicts_with = "database")]
    pub in_memory: bool,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open and migrate the configured database.
    pub fn open_database(&self) -> Result<Database> {
        let db = if self.in_memory {
            tracing::warn!("Using an in-memory database");
            Database::open_memory()?
        } else {
            match &self.database {
                Some(path) => Database::open(path.clone())?,
                None => Database::open_default()?,
            }
        };
        db.migrate()?;
        Ok(db)
    }
}
