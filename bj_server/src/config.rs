//! Server configuration.
//!
//! The bind address and the two table limits, read from `BLACKJACK_*`
//! variables with a `--bind` flag taking precedence.

use std::net::SocketAddr;
use udp_blackjack::{DEFAULT_PORT, MAX_PLAYERS, MIN_PLAYERS, RoundSettings, SettingsError};

pub const BIND_VAR: &str = "BLACKJACK_BIND";
pub const MIN_PLAYERS_VAR: &str = "BLACKJACK_MIN_PLAYERS";
pub const MAX_PLAYERS_VAR: &str = "BLACKJACK_MAX_PLAYERS";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Table size limits
    pub round: RoundSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if the bind address in the environment can't be parsed
    pub fn from_env(bind_override: Option<SocketAddr>) -> Result<Self, ConfigError> {
        Self::from_lookup(bind_override, |key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading variables through `lookup`.
    fn from_lookup<F>(bind_override: Option<SocketAddr>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match lookup(BIND_VAR) {
                Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                    var: BIND_VAR.to_string(),
                    reason: format!("{value:?} is not an IP:PORT address"),
                })?,
                None => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            },
        };

        let round = RoundSettings {
            min_players: parse_or(&lookup, MIN_PLAYERS_VAR, MIN_PLAYERS),
            max_players: parse_or(&lookup, MAX_PLAYERS_VAR, MAX_PLAYERS),
        };

        Ok(ServerConfig { bind, round })
    }

    /// Check the table limits, naming the variable at fault.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.round.validate().map_err(|error| {
            let var = match error {
                SettingsError::MinTooSmall => MIN_PLAYERS_VAR,
                SettingsError::MaxTooLarge | SettingsError::MaxBelowMin(_) => MAX_PLAYERS_VAR,
            };
            ConfigError::Invalid {
                var: var.to_string(),
                reason: error.to_string(),
            }
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
