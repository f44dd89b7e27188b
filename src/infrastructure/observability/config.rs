//! Metrics configuration

use serde::Deserialize;

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_defaults() {
        let config = MetricsConfig::default();

        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_config_partial_deserialize() {
        let config: MetricsConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();

        assert!(!config.enabled);
        assert_eq!(config.path, "/metrics");
    }
}
