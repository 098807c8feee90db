//! Runtime configuration read from the environment
//!
//! `main` loads a `.env` file first (via `dotenvy`), so every variable below
//! can live there as well.

use std::env;
use std::time::Duration;

use crate::filter::DEBOUNCE;

#[derive(Debug, Clone)]
pub struct Config {
    /// `PORT`, default 8080
    pub port: u16,

    /// `DATABASE_URL`, path of the redb file, default "data.db"
    pub database_url: String,

    /// `LISTINGS_PATH`, the page whose query string sessions keep in sync, default "/properties"
    pub listings_path: String,

    /// `SYNC_DEBOUNCE_MS`, default 500
    pub sync_debounce: Duration,

    /// `SESSION_TTL_SECS`, idle time before a session expires, default 1800
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: "data.db".to_string(),
            listings_path: "/properties".to_string(),
            sync_debounce: DEBOUNCE,
            session_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl Config {
    /// Reads the configuration, falling back to defaults for unset or unparsable values
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let listings_path = env::var("LISTINGS_PATH")
            .ok()
            .filter(|path| path.starts_with('/'))
            .unwrap_or(defaults.listings_path);

        let sync_debounce = env::var("SYNC_DEBOUNCE_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.sync_debounce);

        let session_ttl = env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_ttl);

        Self {
            port,
            database_url,
            listings_path,
            sync_debounce,
            session_ttl,
        }
    }
}
