//! Process configuration read from the environment.

use coastwatch_database::db::StoreConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Settings for [`crate::run_server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// TCP port (`PORT`).
    pub port: u16,
    /// Store persistence paths.
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, and the store variables. An unparsable
    /// port falls back to the default with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR")
            .ok()
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let port = match std::env::var("PORT") {
            Ok(value) => value.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT '{value}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        Self {
            bind_addr,
            port,
            store: StoreConfig::from_env(),
        }
    }
}
