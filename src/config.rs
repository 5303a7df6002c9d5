//! Runtime configuration loaded from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a compiled-in default. Unset or unparseable values fall
//! back to that default instead of failing startup; only `DATABASE_URL` is
//! mandatory because the artwork store cannot work without it.

use std::time::Duration;

use crate::room::chat::DEFAULT_CHAT_HISTORY;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EXPIRATION_SECS: u32 = 60;
const DEFAULT_MAX_EXPIRATION_SECS: u32 = 3600;
const DEFAULT_GRACE_TICKS: u32 = 5;
const DEFAULT_TICK_MS: u64 = 1000;
const DEFAULT_MODE: &str = "default";
const DEFAULT_OUTBOX_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
}

// =============================================================================
// ROOM CONFIG
// =============================================================================

/// Tuning knobs shared by every room spawned by this process.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Countdown used when a room is created without an explicit expiration.
    pub default_expiration: u32,
    /// Upper bound applied to requested expirations.
    pub max_expiration: u32,
    /// Grace window between drawing lock and teardown, counted in ticks.
    pub grace_ticks: u32,
    /// Period of the lifecycle tick.
    pub tick: Duration,
    /// Chat backlog capacity.
    pub chat_history: usize,
    /// Mode label used when a room is created without one.
    pub default_mode: String,
    /// Per-connection outbound queue capacity.
    pub outbox_capacity: usize,
}

impl RoomConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let chat_history = env_parse("ROOM_CHAT_HISTORY", DEFAULT_CHAT_HISTORY).max(1);
        Self {
            default_expiration: env_parse("ROOM_DEFAULT_EXPIRATION_SECS", DEFAULT_EXPIRATION_SECS),
            max_expiration: env_parse("ROOM_MAX_EXPIRATION_SECS", DEFAULT_MAX_EXPIRATION_SECS),
            grace_ticks: env_parse("ROOM_GRACE_SECS", DEFAULT_GRACE_TICKS),
            tick: Duration::from_millis(env_parse("ROOM_TICK_MS", DEFAULT_TICK_MS).max(1)),
            chat_history,
            default_mode: std::env::var("ROOM_DEFAULT_MODE").unwrap_or_else(|_| DEFAULT_MODE.into()),
            outbox_capacity: outbox_capacity_for(env_parse("CLIENT_OUTBOX_CAPACITY", DEFAULT_OUTBOX_CAPACITY), chat_history),
        }
    }

    /// Clamp a requested expiration, falling back to the default when absent.
    #[must_use]
    pub fn expiration(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_expiration)
            .min(self.max_expiration)
    }

    /// Pick the mode label for a new room. Blank labels count as absent.
    #[must_use]
    pub fn mode(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim) {
            Some(mode) if !mode.is_empty() => mode.to_owned(),
            _ => self.default_mode.clone(),
        }
    }
}

/// A fresh outbox must hold the snapshot, the whole chat backlog, and one
/// delta queued in the same step.
fn outbox_capacity_for(requested: usize, chat_history: usize) -> usize {
    requested.max(chat_history + 2)
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            default_expiration: DEFAULT_EXPIRATION_SECS,
            max_expiration: DEFAULT_MAX_EXPIRATION_SECS,
            grace_ticks: DEFAULT_GRACE_TICKS,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            chat_history: DEFAULT_CHAT_HISTORY,
            default_mode: DEFAULT_MODE.into(),
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

/// Process-level settings read once in `main`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub rooms: RoomConfig,
}

impl ServerConfig {
    /// Load the server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        Ok(Self { database_url, port: env_parse("PORT", DEFAULT_PORT), rooms: RoomConfig::from_env() })
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
