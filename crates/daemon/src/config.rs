// Daemon configuration from environment variables

use anyhow::{Context, Result};

const DEFAULT_REAPER_HOST: &str = "192.168.1.100";
const DEFAULT_REAPER_PORT: u16 = 8080;
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 3000;
// ~60 fps, matching the device's render loop cadence.
const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone)]
pub struct Config {
    pub reaper_host: String,
    pub reaper_port: u16,
    pub http_timeout_ms: u64,
    pub frame_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            reaper_host: std::env::var("SETLIST_REAPER_HOST")
                .unwrap_or_else(|_| DEFAULT_REAPER_HOST.to_string()),
            reaper_port: env_parsed("SETLIST_REAPER_PORT", DEFAULT_REAPER_PORT)?,
            http_timeout_ms: env_parsed("SETLIST_HTTP_TIMEOUT_MS", DEFAULT_HTTP_TIMEOUT_MS)?,
            frame_ms: env_parsed("SETLIST_FRAME_MS", DEFAULT_FRAME_MS)?,
        })
    }

    /// Control endpoint base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.reaper_host, self.reaper_port)
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
