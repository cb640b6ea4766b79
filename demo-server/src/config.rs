//! Configuration module

use std::env;
use std::str::FromStr;

use flowguard_core::constants::{
    DEFAULT_CONTAMINATION, DEFAULT_DATASET_PATH, DEFAULT_MAX_BYTES_PER_PACKET,
    DEFAULT_MAX_BYTES_PER_SECOND, DEFAULT_MAX_PACKETS_PER_SECOND, DEFAULT_MIN_ANOMALY_SCORE,
    DEFAULT_N_ESTIMATORS, DEFAULT_SEED,
};
use flowguard_core::{ForestConfig, MaxSamples, ThresholdConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Training dataset CSV
    pub dataset_path: String,

    /// Isolation forest parameters
    pub forest: ForestConfig,

    /// Rule thresholds
    pub thresholds: ThresholdConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source. Missing or
    /// unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key);

        Self {
            port: parse_or(get("PORT"), 8501),

            dataset_path: get("DATASET_PATH")
                .unwrap_or_else(|| DEFAULT_DATASET_PATH.to_string()),

            forest: ForestConfig {
                n_estimators: parse_or(get("FOREST_TREES"), DEFAULT_N_ESTIMATORS),
                max_samples: get("FOREST_MAX_SAMPLES")
                    .and_then(|v| parse_max_samples(&v))
                    .unwrap_or(MaxSamples::Auto),
                contamination: parse_or(get("FOREST_CONTAMINATION"), DEFAULT_CONTAMINATION),
                seed: parse_or(get("FOREST_SEED"), DEFAULT_SEED),
            },

            thresholds: ThresholdConfig {
                max_bytes_per_packet: parse_or(get("MAX_BYTES_PER_PACKET"), DEFAULT_MAX_BYTES_PER_PACKET),
                max_bytes_per_second: parse_or(get("MAX_BYTES_PER_SECOND"), DEFAULT_MAX_BYTES_PER_SECOND),
                max_packets_per_second: parse_or(get("MAX_PACKETS_PER_SECOND"), DEFAULT_MAX_PACKETS_PER_SECOND),
                min_anomaly_score: parse_or(get("MIN_ANOMALY_SCORE"), DEFAULT_MIN_ANOMALY_SCORE),
            },
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_max_samples(value: &str) -> Option<MaxSamples> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
        return Some(MaxSamples::Auto);
    }
    value.parse().ok().map(MaxSamples::Fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.port, 8501);
        assert_eq!(config.dataset_path, DEFAULT_DATASET_PATH);
        assert_eq!(config.forest, ForestConfig::default());
        assert_eq!(config.thresholds, ThresholdConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("DATASET_PATH", "/tmp/flows.csv"),
            ("FOREST_TREES", "50"),
            ("FOREST_MAX_SAMPLES", "128"),
            ("FOREST_SEED", "7"),
            ("MAX_BYTES_PER_PACKET", "1500"),
            ("MIN_ANOMALY_SCORE", "-0.6"),
        ]);

        assert_eq!(config.port, 9000);
        assert_eq!(config.dataset_path, "/tmp/flows.csv");
        assert_eq!(config.forest.n_estimators, 50);
        assert_eq!(config.forest.max_samples, MaxSamples::Fixed(128));
        assert_eq!(config.forest.seed, 7);
        assert_eq!(config.thresholds.max_bytes_per_packet, 1500.0);
        assert_eq!(config.thresholds.min_anomaly_score, -0.6);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config(&[
            ("PORT", "not-a-port"),
            ("FOREST_MAX_SAMPLES", "lots"),
            ("FOREST_CONTAMINATION", ""),
        ]);

        assert_eq!(config.port, 8501);
        assert_eq!(config.forest.max_samples, MaxSamples::Auto);
        assert_eq!(config.forest.contamination, DEFAULT_CONTAMINATION);
    }

    #[test]
    fn test_auto_max_samples_case_insensitive() {
        assert_eq!(parse_max_samples("AUTO"), Some(MaxSamples::Auto));
        assert_eq!(parse_max_samples(" 64 "), Some(MaxSamples::Fixed(64)));
    }
}
