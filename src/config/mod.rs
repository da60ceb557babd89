#[cfg(feature = "cli")]
pub mod cli;
pub mod session_file;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::TomlConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_LOGS_PAGE_SIZE: usize = 10;
pub const DEFAULT_LOGS_EXPORT_PATH: &str = "logs_export.csv";

/// Values given explicitly on the command line. They win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_base_url: Option<String>,
    pub session_path: Option<String>,
}

/// Resolved configuration: flags, then the TOML file, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub session_path: String,
    pub timeout_seconds: u64,
    pub debounce_ms: u64,
    pub logs_page_size: usize,
    pub logs_export_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_path: default_session_path(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            logs_page_size: DEFAULT_LOGS_PAGE_SIZE,
            logs_export_path: DEFAULT_LOGS_EXPORT_PATH.to_string(),
        }
    }
}

impl Settings {
    pub fn resolve(file: Option<&TomlConfig>, overrides: &Overrides) -> Self {
        let mut settings = Settings::default();

        if let Some(file) = file {
            if let Some(api) = &file.api {
                if let Some(base_url) = &api.base_url {
                    settings.api_base_url = base_url.clone();
                }
                if let Some(timeout) = api.timeout_seconds {
                    settings.timeout_seconds = timeout;
                }
            }
            if let Some(path) = file.session.as_ref().and_then(|s| s.path.clone()) {
                settings.session_path = path;
            }
            if let Some(debounce) = file.search.as_ref().and_then(|s| s.debounce_ms) {
                settings.debounce_ms = debounce;
            }
            if let Some(logs) = &file.logs {
                if let Some(page_size) = logs.page_size {
                    settings.logs_page_size = page_size;
                }
                if let Some(export_path) = &logs.export_path {
                    settings.logs_export_path = export_path.clone();
                }
            }
        }

        if let Some(base_url) = &overrides.api_base_url {
            settings.api_base_url = base_url.clone();
        }
        if let Some(path) = &overrides.session_path {
            settings.session_path = path.clone();
        }

        settings
    }

    /// Loads the file (when given) and applies the overrides on top.
    pub fn load(config_path: Option<&str>, overrides: &Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };
        let settings = Settings::resolve(file.as_ref(), overrides);
        settings.validate()?;
        Ok(settings)
    }
}

fn default_session_path() -> String {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => format!("{}/.dicciotips/session.json", home),
        _ => ".dicciotips/session.json".to_string(),
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_path("session_path", &self.session_path)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_positive_number("debounce_ms", self.debounce_ms, 1)?;
        validation::validate_positive_number("logs_page_size", self.logs_page_size as u64, 1)?;
        validation::validate_path("logs_export_path", &self.logs_export_path)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn session_path(&self) -> &str {
        &self.session_path
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    fn logs_page_size(&self) -> usize {
        self.logs_page_size
    }

    fn logs_export_path(&self) -> &str {
        &self.logs_export_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(None, &Overrides::default());
        assert_eq!(settings.api_base_url, "http://localhost:8080");
        assert_eq!(settings.debounce_ms, 300);
        assert_eq!(settings.logs_page_size, 10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[api]
base_url = "http://from-file:9000"

[search]
debounce_ms = 150
"#,
        )
        .unwrap();
        let overrides = Overrides {
            api_base_url: Some("http://from-flag:7000".to_string()),
            session_path: None,
        };

        let settings = Settings::resolve(Some(&file), &overrides);
        assert_eq!(settings.api_base_url, "http://from-flag:7000");
        assert_eq!(settings.debounce_ms, 150);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let overrides = Overrides {
            api_base_url: Some("not a url".to_string()),
            session_path: None,
        };
        assert!(Settings::load(None, &overrides).is_err());
    }

    #[test]
    fn test_config_provider_reads_resolved_settings() {
        let file = TomlConfig::from_toml_str(
            r#"
[session]
path = "/tmp/dicciotips/session.json"

[logs]
page_size = 25
export_path = "/tmp/dicciotips/logs.csv"
"#,
        )
        .unwrap();
        let settings = Settings::resolve(Some(&file), &Overrides::default());

        let provider: &dyn ConfigProvider = &settings;
        assert_eq!(provider.session_path(), "/tmp/dicciotips/session.json");
        assert_eq!(provider.logs_page_size(), 25);
        assert_eq!(provider.logs_export_path(), "/tmp/dicciotips/logs.csv");
        assert_eq!(provider.debounce_ms(), 300);
        assert_eq!(provider.request_timeout_seconds(), settings.timeout_seconds);
    }
}
