/*!
 * Relay Configuration
 * Environment-driven settings for the relay daemon
 */

use crate::core::errors::ConfigError;
use crate::signals::{Signal, NSIG};
use serde::{Deserialize, Serialize};

/// Signals the daemon subscribes to by default
pub const DEFAULT_SIGNALS: &str = "SIGHUP,SIGINT,SIGTERM,SIGUSR1,SIGUSR2";

/// Signals that stop the daemon by default
pub const DEFAULT_EXIT_SIGNALS: &str = "SIGINT,SIGTERM";

/// Default capacity of the async forwarding channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Relay daemon configuration
///
/// Environment variables:
/// - SIGRELAY_SIGNALS: comma-separated signals to relay
/// - SIGRELAY_EXIT_SIGNALS: comma-separated signals that stop the relay
/// - SIGRELAY_CHANNEL_CAPACITY: async channel capacity
/// - SIGRELAY_TRACE_JSON: `1` or `true` for JSON logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub signals: Vec<u32>,
    pub exit_signals: Vec<u32>,
    pub channel_capacity: usize,
    pub trace_json: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            // The defaults are static names known to the catalogue.
            signals: parse_signal_list(DEFAULT_SIGNALS).unwrap_or_default(),
            exit_signals: parse_signal_list(DEFAULT_EXIT_SIGNALS).unwrap_or_default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            trace_json: false,
        }
    }
}

impl RelayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SIGRELAY_SIGNALS") {
            config.signals = parse_signal_list(&value)?;
        }
        if let Some(value) = lookup("SIGRELAY_EXIT_SIGNALS") {
            config.exit_signals = parse_signal_list(&value)?;
        }
        if let Some(value) = lookup("SIGRELAY_CHANNEL_CAPACITY") {
            config.channel_capacity = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: "SIGRELAY_CHANNEL_CAPACITY".into(),
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup("SIGRELAY_TRACE_JSON") {
            config.trace_json = value == "1" || value.eq_ignore_ascii_case("true");
        }

        // Exit signals must be relayed, otherwise the daemon could never stop.
        for &sig in &config.exit_signals {
            if !config.signals.contains(&sig) {
                config.signals.push(sig);
            }
        }

        Ok(config)
    }

    /// Check whether `signal` should stop the relay
    pub fn is_exit_signal(&self, signal: u32) -> bool {
        self.exit_signals.contains(&signal)
    }
}

/// Parse one signal given by name or number
pub fn parse_signal(token: &str) -> Result<u32, ConfigError> {
    let token = token.trim();
    if let Ok(number) = token.parse::<u32>() {
        if number > 0 && number < NSIG {
            return Ok(number);
        }
        return Err(ConfigError::UnknownSignal(token.to_string()));
    }
    Signal::from_name(token)
        .map(|sig| sig.number())
        .ok_or_else(|| ConfigError::UnknownSignal(token.to_string()))
}

/// Parse a comma-separated signal list, dropping duplicates
pub fn parse_signal_list(list: &str) -> Result<Vec<u32>, ConfigError> {
    let mut signals = Vec::new();
    for token in list.split(',').filter(|t| !t.trim().is_empty()) {
        let sig = parse_signal(token)?;
        if !signals.contains(&sig) {
            signals.push(sig);
        }
    }
    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(
            config.signals,
            vec![
                Signal::SIGHUP.number(),
                Signal::SIGINT.number(),
                Signal::SIGTERM.number(),
                Signal::SIGUSR1.number(),
                Signal::SIGUSR2.number(),
            ]
        );
        assert_eq!(config.exit_signals, vec![2, 15]);
        assert!(!config.trace_json);
    }

    #[test]
    fn test_parse_signal_forms() {
        assert_eq!(parse_signal("SIGHUP").unwrap(), 1);
        assert_eq!(parse_signal(" usr2 ").unwrap(), Signal::SIGUSR2.number());
        assert_eq!(parse_signal("34").unwrap(), 34);
        assert!(parse_signal("0").is_err());
        assert!(parse_signal("65").is_err());
        assert!(parse_signal("SIGBOGUS").is_err());
    }

    #[test]
    fn test_parse_list_dedups_and_skips_blanks() {
        assert_eq!(parse_signal_list("HUP, ,1,SIGTERM,").unwrap(), vec![1, 15]);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let env: HashMap<&str, &str> = [
            ("SIGRELAY_SIGNALS", "SIGUSR1"),
            ("SIGRELAY_EXIT_SIGNALS", "SIGQUIT"),
            ("SIGRELAY_CHANNEL_CAPACITY", "8"),
            ("SIGRELAY_TRACE_JSON", "true"),
        ]
        .into_iter()
        .collect();

        let config = RelayConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.signals, vec![Signal::SIGUSR1.number(), 3]);
        assert_eq!(config.exit_signals, vec![3]);
        assert_eq!(config.channel_capacity, 8);
        assert!(config.trace_json);
        assert!(config.is_exit_signal(3));
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let bad_signal = RelayConfig::from_lookup(|k| {
            (k == "SIGRELAY_SIGNALS").then(|| "SIGNOPE".to_string())
        });
        assert_eq!(bad_signal, Err(ConfigError::UnknownSignal("SIGNOPE".into())));

        let bad_capacity = RelayConfig::from_lookup(|k| {
            (k == "SIGRELAY_CHANNEL_CAPACITY").then(|| "0".to_string())
        });
        assert!(matches!(bad_capacity, Err(ConfigError::InvalidValue { .. })));
    }
}
