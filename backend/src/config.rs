//! Runtime configuration read from the environment (and `.env`, loaded in
//! `main`).

use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL: &str = "amazon/nova-2-lite-v1:free";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Plan requests fail with a provider error while this is unset
    pub openrouter_api_key: Option<String>,
    pub openrouter_url: String,
    pub plan_model: String,
    /// Directory holding the persisted planner state
    pub data_dir: PathBuf,
    /// Static front end served for every non-API path
    pub static_dir: PathBuf,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            openrouter_api_key: None,
            openrouter_url: DEFAULT_OPENROUTER_URL.to_string(),
            plan_model: DEFAULT_MODEL.to_string(),
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("public"),
            cors_origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let host = match get("HOST") {
            Some(host) => host
                .parse()
                .with_context(|| format!("HOST is not an IP address: {}", host))?,
            None => defaults.host,
        };
        let port = match get("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?,
            None => defaults.port,
        };

        Ok(Self {
            host,
            port,
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_url: get("OPENROUTER_URL").unwrap_or(defaults.openrouter_url),
            plan_model: get("PLAN_MODEL").unwrap_or(defaults.plan_model),
            data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            cors_origin: get("CORS_ORIGIN"),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
