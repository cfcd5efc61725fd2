use std::path::PathBuf;

use clap::Args;

use crate::db::Database;

/// Where the SQLite file lives.
#[derive(Debug, Clone, Default, Args)]
pub struct StoreConfig {
    /// Path to the database file [default: platform data directory]
    #[arg(long, env = "TASKBOARD_DATABASE", global = true)]
    pub database: Option<PathBuf>,
}

impl StoreConfig {
    /// Opens the configured database and brings its schema up to date.
    pub fn open(&self) -> anyhow::Result<Database> {
        let path = match &self.database {
            Some(path) => path.clone(),
            None => Database::default_path()?,
        };

        let db = Database::open(&path)?;
        db.migrate()?;
        tracing::info!("Using database at {}", path.display());
        Ok(db)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind the HTTP API to
    #[arg(long, env = "TASKBOARD_HOST", default_value = "127.0.0.1", global = true)]
    pub host: String,

    /// Port for HTTP API
    #[arg(short, long, env = "TASKBOARD_PORT", default_value_t = 8080, global = true)]
    pub port: u16,

    #[command(flatten)]
    pub store: StoreConfig,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
