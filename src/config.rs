use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub path: String,
    pub mirror_suffix: String,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Try to load from .env file
        let _ = dotenv::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from defaults plus whatever `lookup` returns
    /// for the recognized variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .set_default("store.path", "./search.db")?
            .set_default("store.mirror_suffix", "_fts")?
            .set_default("store.sample_size", 10)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?;

        if let Some(database_url) = lookup("DATABASE_URL") {
            builder = builder.set_override("store.path", database_url)?;
        }

        if let Some(suffix) = lookup("FTS_SUFFIX") {
            builder = builder.set_override("store.mirror_suffix", suffix)?;
        }

        if let Some(sample_size) = lookup("SAMPLE_SIZE") {
            builder = builder.set_override(
                "store.sample_size",
                sample_size.parse::<u64>().unwrap_or(10),
            )?;
        }

        if let Some(host) = lookup("HOST") {
            builder = builder.set_override("server.host", host)?;
        }

        if let Some(port) = lookup("PORT") {
            builder = builder.set_override("server.port", port.parse::<u16>().unwrap_or(3000))?;
        }

        if let Some(log_level) = lookup("RUST_LOG") {
            builder = builder.set_override("logging.level", log_level)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Replace the configured store path, e.g. from a command line argument
    pub fn with_store_path(mut self, path: impl Into<String>) -> Self {
        self.store.path = path.into();
        self
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
