//! ICP configuration document: a title plus the list of rules a profile is judged against.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcpConfig {
    /// Older configuration files call this `icp_focus`.
    #[serde(default, alias = "icp_focus", skip_serializing_if = "Option::is_none")]
    pub icp_title: Option<String>,
    pub rules: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read ICP config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ICP config {path} is not valid: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ICP config {path} has no rules")]
    NoRules { path: PathBuf },
}

impl IcpConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw, path)
    }

    /// Parses a config document; `origin` is only used in error messages.
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: IcpConfig = serde_json::from_str(raw).map_err(|source| ConfigError::Invalid {
            path: origin.to_path_buf(),
            source,
        })?;

        if config.rules.is_empty() {
            return Err(ConfigError::NoRules {
                path: origin.to_path_buf(),
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE: &str = r#"{
        "icp_focus": "Enterprise SaaS Sales Director",
        "rules": [
            "Must be a Director-level or higher.",
            "Must explicitly mention experience selling software or SaaS products.",
            "Must mention keywords like 'quota', 'pipeline management', or 'global teams'."
        ]
    }"#;

    #[test]
    fn test_load_example_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();

        let config = IcpConfig::load(file.path()).unwrap();
        assert_eq!(
            config.icp_title.as_deref(),
            Some("Enterprise SaaS Sales Director")
        );
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.rules[0], "Must be a Director-level or higher.");
    }

    #[test]
    fn test_icp_title_key_is_accepted() {
        let config =
            IcpConfig::from_json(r#"{"icp_title": "CTO", "rules": ["r"]}"#, Path::new("x.json"))
                .unwrap();
        assert_eq!(config.icp_title.as_deref(), Some("CTO"));
    }

    #[test]
    fn test_title_is_optional() {
        let config = IcpConfig::from_json(r#"{"rules": ["r"]}"#, Path::new("x.json")).unwrap();
        assert!(config.icp_title.is_none());
    }

    #[test]
    fn test_rules_pass_through_unchanged() {
        let config = IcpConfig::from_json(
            r#"{"rules": ["  spaced  ", "dup", "dup"]}"#,
            Path::new("x.json"),
        )
        .unwrap();
        assert_eq!(config.rules, vec!["  spaced  ", "dup", "dup"]);
    }

    #[test]
    fn test_empty_rules_are_rejected() {
        let err = IcpConfig::from_json(r#"{"rules": []}"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NoRules { .. }));
    }

    #[test]
    fn test_rules_must_be_strings() {
        let err = IcpConfig::from_json(r#"{"rules": [1, 2]}"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_rules_is_invalid() {
        let err =
            IcpConfig::from_json(r#"{"icp_title": "CTO"}"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = IcpConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
