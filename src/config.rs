//! Environment configuration.
//!
//! Two knobs, both read once at startup:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `ROSTERD_ADDR` | `0.0.0.0:8000` | Listen address |
//! | `ROSTERD_ALLOWED_ORIGINS` | `http://localhost:8000` | Comma-separated CORS allow-list |

use std::env;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Runtime configuration, resolved from the environment with defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// `host:port` the server binds to.
    pub addr: String,
    /// Origins granted permissive CORS headers.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let addr = env::var("ROSTERD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
        let allowed_origins = env::var("ROSTERD_ALLOWED_ORIGINS")
            .map(|raw| Self::parse_origins(&raw))
            .unwrap_or_else(|_| vec![DEFAULT_ORIGIN.to_owned()]);
        Self { addr, allowed_origins }
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_owned(),
            allowed_origins: vec![DEFAULT_ORIGIN.to_owned()],
        }
    }
}
