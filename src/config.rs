//! Configuration loaded from environment variables

use std::time::Duration;

use crate::scan::ScanConfig;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Wireless interfaces to scan
    pub interfaces: Vec<String>,

    /// Scan timing and buffer limits
    pub scan: ScanConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ScanConfig::default();
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };
        let bytes = |key: &str, default: usize| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        let interfaces: Vec<String> = lookup("WIFI_INTERFACES")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            interfaces: if interfaces.is_empty() {
                vec!["wlan0".to_string()]
            } else {
                interfaces
            },

            scan: ScanConfig {
                timeout: millis("SCAN_TIMEOUT_MS", defaults.timeout),
                initial_wait: millis("SCAN_INITIAL_WAIT_MS", defaults.initial_wait),
                poll_wait: millis("SCAN_POLL_WAIT_MS", defaults.poll_wait),
                initial_buffer_size: bytes("SCAN_BUFFER_SIZE", defaults.initial_buffer_size),
                max_buffer_size: bytes("SCAN_MAX_BUFFER_SIZE", defaults.max_buffer_size),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.interfaces, vec!["wlan0"]);
        assert_eq!(config.scan, ScanConfig::default());
        assert_eq!(config.scan.timeout, Duration::from_secs(15));
        assert_eq!(config.scan.max_buffer_size, 100_000);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("WIFI_INTERFACES", "wlan0, wlan1,,"),
            ("SCAN_TIMEOUT_MS", "5000"),
            ("SCAN_POLL_WAIT_MS", "250"),
            ("SCAN_BUFFER_SIZE", "8192"),
        ]);
        assert_eq!(config.interfaces, vec!["wlan0", "wlan1"]);
        assert_eq!(config.scan.timeout, Duration::from_secs(5));
        assert_eq!(config.scan.poll_wait, Duration::from_millis(250));
        assert_eq!(config.scan.initial_wait, Duration::from_secs(2));
        assert_eq!(config.scan.initial_buffer_size, 8192);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("WIFI_INTERFACES", " , "),
            ("SCAN_TIMEOUT_MS", "soon"),
            ("SCAN_MAX_BUFFER_SIZE", "-1"),
        ]);
        assert_eq!(config.interfaces, vec!["wlan0"]);
        assert_eq!(config.scan.timeout, Duration::from_secs(15));
        assert_eq!(config.scan.max_buffer_size, 100_000);
    }
}
