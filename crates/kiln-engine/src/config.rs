//! Engine configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration of the instantiation engine
///
/// Every bound the engine enforces lives here: the cache capacity, the
/// cached-entry lifetime, and the resolver invocation timeout. Values come
/// from `Default`, builder methods, deserialized config, or the environment
/// ([`EngineConfig::from_env`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of cached instances
    pub cache_capacity: u64,
    /// Seconds a cached instance lives before expiry
    pub entry_ttl_secs: u64,
    /// Seconds a single resolver invocation may run
    pub resolve_timeout_secs: u64,
}

/// Environment variable for [`EngineConfig::cache_capacity`]
pub const ENV_CACHE_CAPACITY: &str = "KILN_CACHE_CAPACITY";
/// Environment variable for [`EngineConfig::entry_ttl_secs`]
pub const ENV_ENTRY_TTL_SECS: &str = "KILN_ENTRY_TTL_SECS";
/// Environment variable for [`EngineConfig::resolve_timeout_secs`]
pub const ENV_RESOLVE_TIMEOUT_SECS: &str = "KILN_RESOLVE_TIMEOUT_SECS";

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub const fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With entry time-to-live in seconds
    #[inline]
    #[must_use]
    pub const fn with_entry_ttl_secs(mut self, secs: u64) -> Self {
        self.entry_ttl_secs = secs;
        self
    }

    /// With resolver timeout in seconds
    #[inline]
    #[must_use]
    pub const fn with_resolve_timeout_secs(mut self, secs: u64) -> Self {
        self.resolve_timeout_secs = secs;
        self
    }

    /// Entry time-to-live as a [`Duration`]
    #[inline]
    #[must_use]
    pub const fn entry_ttl(&self) -> Duration {
        Duration::from_secs(self.entry_ttl_secs)
    }

    /// Resolver timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub const fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }

    /// Read overrides from the environment on top of the defaults
    ///
    /// Recognizes `KILN_CACHE_CAPACITY`, `KILN_ENTRY_TTL_SECS`, and
    /// `KILN_RESOLVE_TIMEOUT_SECS`. Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if a variable is set but does not
    /// parse as an unsigned integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(capacity) = env_var(ENV_CACHE_CAPACITY)? {
            config.cache_capacity = capacity;
        }
        if let Some(ttl) = env_var(ENV_ENTRY_TTL_SECS)? {
            config.entry_ttl_secs = ttl;
        }
        if let Some(timeout) = env_var(ENV_RESOLVE_TIMEOUT_SECS)? {
            config.resolve_timeout_secs = timeout;
        }
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 10_000,
            entry_ttl_secs: 600,
            resolve_timeout_secs: 30,
        }
    }
}

fn env_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::Invalid {
            var,
            value: "<non-unicode>".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded() {
        let config = EngineConfig::new();
        assert_eq!(config.cache_capacity, 10_000);
        assert_eq!(config.entry_ttl(), Duration::from_secs(600));
        assert_eq!(config.resolve_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let config = EngineConfig::new()
            .with_cache_capacity(64)
            .with_entry_ttl_secs(5)
            .with_resolve_timeout_secs(1);
        assert_eq!(config.cache_capacity, 64);
        assert_eq!(config.entry_ttl_secs, 5);
        assert_eq!(config.resolve_timeout_secs, 1);
    }

    #[test]
    fn serde_round_trip() {
        let config = EngineConfig::new().with_cache_capacity(128);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    // Env-var tests mutate process state; run them as one test so they
    // cannot race each other.
    #[test]
    fn from_env_reads_overrides_and_rejects_garbage() {
        std::env::set_var(ENV_CACHE_CAPACITY, "256");
        std::env::set_var(ENV_ENTRY_TTL_SECS, "120");
        std::env::remove_var(ENV_RESOLVE_TIMEOUT_SECS);

        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.entry_ttl_secs, 120);
        assert_eq!(config.resolve_timeout_secs, 30);

        std::env::set_var(ENV_CACHE_CAPACITY, "lots");
        let err = EngineConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: ENV_CACHE_CAPACITY,
                ..
            }
        ));

        std::env::remove_var(ENV_CACHE_CAPACITY);
        std::env::remove_var(ENV_ENTRY_TTL_SECS);
    }
}
