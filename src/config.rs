//! Runtime configuration from environment variables

use crate::llm::{AzureConfig, DEFAULT_API_VERSION, DEFAULT_MODEL};
use crate::system_prompt::DEFAULT_SITE_NAME;
use std::path::PathBuf;
use std::time::Duration;

/// Server-side budget for one chat request
pub const CHAT_MAX_DURATION: Duration = Duration::from_secs(30);

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub content_dir: PathBuf,
    pub site_name: String,
    /// `None` when the provider secrets are not set
    pub azure: Option<AzureConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("Z360_DOCS_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let azure = match (non_empty("AZURE_RESOURCE_NAME"), non_empty("AZURE_API_KEY")) {
            (Some(resource_name), Some(api_key)) => Some(AzureConfig {
                resource_name,
                api_key,
                api_version: non_empty("AZURE_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                model: non_empty("Z360_DOCS_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            }),
            _ => None,
        };

        Self {
            port,
            content_dir: non_empty("Z360_DOCS_CONTENT_DIR")
                .map_or_else(|| PathBuf::from("content/docs"), PathBuf::from),
            site_name: non_empty("Z360_DOCS_SITE_NAME")
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            azure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.content_dir, PathBuf::from("content/docs"));
        assert_eq!(config.site_name, DEFAULT_SITE_NAME);
        assert!(config.azure.is_none());
    }

    #[test]
    fn test_azure_requires_both_secrets() {
        assert!(config(&[("AZURE_RESOURCE_NAME", "z360")]).azure.is_none());
        assert!(config(&[("AZURE_RESOURCE_NAME", "z360"), ("AZURE_API_KEY", " ")])
            .azure
            .is_none());

        let azure = config(&[("AZURE_RESOURCE_NAME", "z360"), ("AZURE_API_KEY", "k")])
            .azure
            .unwrap();
        assert_eq!(azure.model, DEFAULT_MODEL);
        assert_eq!(azure.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("Z360_DOCS_PORT", "8080"),
            ("Z360_DOCS_CONTENT_DIR", "/srv/docs"),
            ("Z360_DOCS_SITE_NAME", "Acme"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.content_dir, PathBuf::from("/srv/docs"));
        assert_eq!(config.site_name, "Acme");
    }

    #[test]
    fn test_bad_port_falls_back() {
        assert_eq!(config(&[("Z360_DOCS_PORT", "eighty")]).port, 3000);
    }
}
