//! Process-wide defaults and server settings
//!
//! Everything here is built once in `main` and shared read-only for the
//! lifetime of the process. Numeric environment values that fail to parse
//! are treated as absent rather than as errors, so a typo in
//! `LUMEN_TEMPERATURE` falls back to "no override" instead of refusing
//! requests.

use std::env;

/// Port used when `LUMEN_PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 2526;

/// Process-wide generation defaults
///
/// Each field backs one request field: a request that omits the field
/// falls back to the value here, and if that is also absent the engine's
/// own default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    /// Default system instructions (`LUMEN_SYSTEM`)
    pub system: Option<String>,

    /// Default sampling temperature (`LUMEN_TEMPERATURE`)
    pub temperature: Option<f64>,

    /// Default maximum response tokens (`LUMEN_MAX_TOKENS`)
    pub max_tokens: Option<usize>,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Restrict the listener to loopback addresses on both families
    pub local_only: bool,
}

impl Defaults {
    /// Read defaults from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read defaults through an arbitrary lookup function.
    ///
    /// Kept separate from [`Defaults::from_env`] so the parsing rules can
    /// be tested without touching the real environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            system: lookup("LUMEN_SYSTEM"),
            temperature: lookup("LUMEN_TEMPERATURE").and_then(|v| v.parse().ok()),
            max_tokens: lookup("LUMEN_MAX_TOKENS").and_then(|v| v.parse().ok()),
        }
    }
}

impl ServerConfig {
    /// Read listener settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: lookup("LUMEN_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            local_only: lookup("LUMEN_LOCAL_ONLY")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// IPv4 bind address for the configured exposure.
    pub fn bind_addr_v4(&self) -> &'static str {
        if self.local_only {
            "127.0.0.1"
        } else {
            "0.0.0.0"
        }
    }

    /// IPv6 bind address for the configured exposure.
    pub fn bind_addr_v6(&self) -> &'static str {
        if self.local_only {
            "::1"
        } else {
            "::"
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            local_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in<'a>(vars: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults_all_absent() {
        let vars = HashMap::new();
        let defaults = Defaults::from_lookup(lookup_in(&vars));
        assert_eq!(defaults, Defaults::default());
    }

    #[test]
    fn test_defaults_parsed() {
        let vars = HashMap::from([
            ("LUMEN_SYSTEM", "be brief"),
            ("LUMEN_TEMPERATURE", "0.7"),
            ("LUMEN_MAX_TOKENS", "512"),
        ]);
        let defaults = Defaults::from_lookup(lookup_in(&vars));
        assert_eq!(defaults.system.as_deref(), Some("be brief"));
        assert_eq!(defaults.temperature, Some(0.7));
        assert_eq!(defaults.max_tokens, Some(512));
    }

    #[test]
    fn test_unparsable_numbers_fail_open() {
        let vars = HashMap::from([
            ("LUMEN_TEMPERATURE", "warm"),
            ("LUMEN_MAX_TOKENS", "lots"),
        ]);
        let defaults = Defaults::from_lookup(lookup_in(&vars));
        assert_eq!(defaults.temperature, None);
        assert_eq!(defaults.max_tokens, None);
    }

    #[test]
    fn test_server_config_defaults() {
        let vars = HashMap::new();
        let config = ServerConfig::from_lookup(lookup_in(&vars));
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.local_only);
    }

    #[test]
    fn test_server_config_bad_port_falls_back() {
        let vars = HashMap::from([("LUMEN_PORT", "not-a-port")]);
        let config = ServerConfig::from_lookup(lookup_in(&vars));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_local_only_case_insensitive() {
        let vars = HashMap::from([("LUMEN_LOCAL_ONLY", "TRUE")]);
        let config = ServerConfig::from_lookup(lookup_in(&vars));
        assert!(config.local_only);
        assert_eq!(config.bind_addr_v4(), "127.0.0.1");
        assert_eq!(config.bind_addr_v6(), "::1");
    }

    #[test]
    fn test_open_bind_addresses() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr_v4(), "0.0.0.0");
        assert_eq!(config.bind_addr_v6(), "::");
    }
}
