use crate::utils::error::{DicciotipsError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

/// On-disk configuration. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiSection>,
    pub session: Option<SessionSection>,
    pub search: Option<SearchSection>,
    pub logs: Option<LogsSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSection {
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsSection {
    pub page_size: Option<usize>,
    pub export_path: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DicciotipsError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DicciotipsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(base_url) = self.api.as_ref().and_then(|a| a.base_url.as_deref()) {
            crate::utils::validation::validate_url("api.base_url", base_url)?;
        }

        if let Some(timeout) = self.api.as_ref().and_then(|a| a.timeout_seconds) {
            crate::utils::validation::validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }

        if let Some(path) = self.session.as_ref().and_then(|s| s.path.as_deref()) {
            crate::utils::validation::validate_path("session.path", path)?;
        }

        if let Some(debounce) = self.search.as_ref().and_then(|s| s.debounce_ms) {
            crate::utils::validation::validate_positive_number("search.debounce_ms", debounce, 1)?;
        }

        if let Some(logs) = &self.logs {
            if let Some(page_size) = logs.page_size {
                crate::utils::validation::validate_positive_number(
                    "logs.page_size",
                    page_size as u64,
                    1,
                )?;
            }
            if let Some(export_path) = logs.export_path.as_deref() {
                crate::utils::validation::validate_path("logs.export_path", export_path)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "http://dicciotips.local:8080"
timeout_seconds = 15

[session]
path = "/tmp/dicciotips/session.json"

[search]
debounce_ms = 250

[logs]
page_size = 20
export_path = "./exports/logs.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        let api = config.api.as_ref().unwrap();
        assert_eq!(api.base_url.as_deref(), Some("http://dicciotips.local:8080"));
        assert_eq!(api.timeout_seconds, Some(15));
        assert_eq!(config.search.as_ref().unwrap().debounce_ms, Some(250));
        assert_eq!(config.logs.as_ref().unwrap().page_size, Some(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.api.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DICCIOTIPS_TEST_BACKEND", "https://lsa.example.org");

        let toml_content = r#"
[api]
base_url = "${DICCIOTIPS_TEST_BACKEND}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.api.unwrap().base_url.as_deref(),
            Some("https://lsa.example.org")
        );

        std::env::remove_var("DICCIOTIPS_TEST_BACKEND");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[logs]
page_size = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let err = TomlConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, DicciotipsError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[search]\ndebounce_ms = 500\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.search.unwrap().debounce_ms, Some(500));
    }
}
