// Server configuration from environment variables

use anyhow::{Context, Result};

/// Runtime configuration for the API server
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// `DATABASE_URL` is required; `PORT` defaults to 3000.
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().context("PORT must be a valid port number")?,
            Err(_) => 3000,
        };

        Ok(Self { database_url, port })
    }
}
