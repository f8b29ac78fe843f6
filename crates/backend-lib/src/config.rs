// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::auth::session::{DEFAULT_SESSION_TTL_SECS, REMEMBER_ME_TTL_SECS};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level / `EnvFilter` directive
    pub log_level: String,
    /// Secret the bearer tokens are signed with
    pub jwt_secret: String,
    /// Default session TTL in seconds
    pub session_ttl_secs: u64,
    /// Remember-me session TTL in seconds
    pub remember_me_ttl_secs: u64,
    /// Allowed CORS origin ("*" for any)
    pub cors_origin: String,
    /// Auth endpoint rate limiting
    pub rate_limit: RateLimitSettings,
}

/// Rate limiting for the register and login endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Attempt window in seconds
    pub window_secs: u64,
    /// Attempts allowed per window
    pub max_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".parse().unwrap(),
            log_level: "info".to_string(),
            jwt_secret: "dev-secret-change-me".to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            remember_me_ttl_secs: REMEMBER_ME_TTL_SECS,
            cors_origin: "http://localhost:3000".to_string(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_attempts: 5,
        }
    }
}

impl Settings {
    /// Load settings: defaults, then `config.toml`, then `EMBRACE_*` env vars.
    pub fn load() -> Result<Self> {
        Self::figment(Toml::file("config.toml")).extract().map_err(Into::into)
    }

    /// Load settings from an explicit TOML file path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::figment(Toml::file(path.as_ref())).extract().map_err(Into::into)
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(file)
            .merge(Env::prefixed("EMBRACE_").split("__"))
    }
}
