//! Environment-driven settings. An optional `.env` file is loaded first; CLI
//! flags override whatever is read here.

use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use thiserror::Error;

pub const BIND_VAR: &str = "WOUNDSIM_BIND";
pub const WORKERS_VAR: &str = "WOUNDSIM_WORKERS";
pub const PARALLEL_THRESHOLD_VAR: &str = "WOUNDSIM_PARALLEL_THRESHOLD";

pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3000));
pub const DEFAULT_PARALLEL_THRESHOLD: u32 = 256;
pub const DEFAULT_LOG_FILTER: &str = "woundsim=info,tower_http=info";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var} '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Worker threads for parallel batches; 0 means Rayon's default.
    pub workers: usize,
    pub parallel_threshold: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND,
            workers: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(%err, "ignoring unreadable .env file");
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            bind_addr: parse_var(&lookup, BIND_VAR)?.unwrap_or(defaults.bind_addr),
            workers: parse_var(&lookup, WORKERS_VAR)?.unwrap_or(defaults.workers),
            parallel_threshold: parse_var(&lookup, PARALLEL_THRESHOLD_VAR)?
                .unwrap_or(defaults.parallel_threshold),
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: err.to_string(),
        })
}
