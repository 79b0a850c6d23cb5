//! CLI settings: defaults, then the TOML config file, then `PLANETS_*` env vars

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File, Source};
use planets_network::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::Level;

pub const ENV_BASE_URL: &str = "PLANETS_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PLANETS_REQUEST_TIMEOUT_SECS";
pub const ENV_RESOURCE_TIMEOUT_SECS: &str = "PLANETS_RESOURCE_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "PLANETS_LOG_LEVEL";

const DEFAULT_WORK_DIR: &str = ".planets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL endpoint paths are joined onto
    pub base_url: String,
    /// Connect and idle read timeout, in seconds
    pub request_timeout_secs: u64,
    /// Whole-call timeout, in seconds
    pub resource_timeout_secs: u64,
    /// Log level used unless `--log-level` is given
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://swapi.dev/api/".to_string(),
            request_timeout_secs: 15,
            resource_timeout_secs: 20,
            log_level: "info".to_string(),
        }
    }
}

/// Problem found while loading settings, logged once the subscriber is up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Logged at error level
    Error(String),
    /// Logged at warn level
    Warn(String),
}

impl Diagnostic {
    pub fn emit(&self) {
        match self {
            Diagnostic::Error(msg) => tracing::error!("{}", msg),
            Diagnostic::Warn(msg) => tracing::warn!("{}", msg),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file cannot be read
    ///
    /// An explicitly named file must exist; the default location is optional.
    /// Nothing is logged here: problems come back as [`Diagnostic`]s because
    /// the log level itself is one of the settings.
    pub fn load<P>(config_file_name: Option<P>) -> (Self, Vec<Diagnostic>)
    where
        P: Into<PathBuf>,
    {
        let mut diagnostics = Vec::new();
        let default_settings = Self::default();

        let settings = match Self::new_from_default(&default_settings, config_file_name) {
            Ok(settings) => settings,
            Err(e) => {
                diagnostics.push(Diagnostic::Error(format!(
                    "Error reading config file, falling back to defaults. Error: {e:?}"
                )));
                default_settings
            }
        };

        let settings = settings.from_env(&mut diagnostics);
        (settings, diagnostics)
    }

    fn new_from_default<P>(
        default: &Settings,
        config_file_name: Option<P>,
    ) -> Result<Self, ConfigError>
    where
        P: Into<PathBuf>,
    {
        let file = match config_file_name {
            Some(path) => File::from(path.into()).required(true),
            None => {
                let path = home::home_dir()
                    .ok_or(ConfigError::NotFound("Config Path".to_string()))?
                    .join(DEFAULT_WORK_DIR)
                    .join("config.toml");
                File::from(path).required(false)
            }
        };

        Self::from_source(default, file)
    }

    fn from_source<S>(default: &Settings, source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            // use defaults
            .add_source(Config::try_from(default)?)
            // override with file contents
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Override fields from `PLANETS_*` environment variables
    pub fn from_env(self, diagnostics: &mut Vec<Diagnostic>) -> Self {
        self.override_with(|key| env::var(key).ok(), diagnostics)
    }

    fn override_with<F>(mut self, lookup: F, diagnostics: &mut Vec<Diagnostic>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }

        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            match secs.parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => diagnostics.push(invalid_var(ENV_REQUEST_TIMEOUT_SECS, &secs)),
            }
        }

        if let Some(secs) = lookup(ENV_RESOURCE_TIMEOUT_SECS) {
            match secs.parse() {
                Ok(secs) => self.resource_timeout_secs = secs,
                Err(_) => diagnostics.push(invalid_var(ENV_RESOURCE_TIMEOUT_SECS, &secs)),
            }
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            match level.parse::<Level>() {
                Ok(_) => self.log_level = level,
                Err(_) => diagnostics.push(invalid_var(ENV_LOG_LEVEL, &level)),
            }
        }

        self
    }

    /// Configured log level
    pub fn level(&self) -> Result<Level, String> {
        self.log_level
            .parse()
            .map_err(|_| format!("Invalid log level '{}', using info", self.log_level))
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::default()
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_resource_timeout(Duration::from_secs(self.resource_timeout_secs))
    }
}

fn invalid_var(key: &str, value: &str) -> Diagnostic {
    Diagnostic::Warn(format!("Ignoring invalid {}: {}", key, value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_source(&Settings::default(), File::from_str(toml, FileFormat::Toml))
    }

    #[test]
    fn test_defaults_match_transport_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.transport_config(), TransportConfig::default());
        assert_eq!(settings.level(), Ok(Level::INFO));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            base_url = "http://localhost:8080/api/"
            request_timeout_secs = 5
        "#;
        let settings = from_toml(toml).expect("Valid settings");

        assert_eq!(settings.base_url, "http://localhost:8080/api/");
        assert_eq!(settings.request_timeout_secs, 5);
        assert_eq!(settings.resource_timeout_secs, 20);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_file_sets_log_level() {
        let settings = from_toml(r#"log_level = "debug""#).expect("Valid settings");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.level(), Ok(Level::DEBUG));
    }

    #[test]
    fn test_invalid_log_level_in_file() {
        let settings = from_toml(r#"log_level = "chatty""#).expect("Valid settings");
        let err = settings.level().expect_err("Unknown level");
        assert!(err.contains("chatty"));
    }

    #[test]
    fn test_bad_value_is_an_error() {
        assert!(from_toml(r#"request_timeout_secs = "soon""#).is_err());
    }

    #[test]
    fn test_missing_explicit_file_falls_back_to_defaults() {
        let missing = "/nonexistent/planets/config.toml";
        assert!(Settings::new_from_default(&Settings::default(), Some(missing)).is_err());

        let (_, diagnostics) = Settings::load(Some(missing));
        match diagnostics.first() {
            Some(Diagnostic::Error(msg)) => assert!(msg.contains("falling back to defaults")),
            other => panic!("Expected a config error diagnostic, got {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "http://localhost:9000/api/"),
            (ENV_REQUEST_TIMEOUT_SECS, "3"),
            (ENV_RESOURCE_TIMEOUT_SECS, "not-a-number"),
            (ENV_LOG_LEVEL, "trace"),
        ]);
        let mut diagnostics = Vec::new();

        let settings = Settings::default()
            .override_with(|key| vars.get(key).map(|v| v.to_string()), &mut diagnostics);

        assert_eq!(settings.base_url, "http://localhost:9000/api/");
        assert_eq!(settings.request_timeout_secs, 3);
        assert_eq!(settings.resource_timeout_secs, 20);
        assert_eq!(settings.level(), Ok(Level::TRACE));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::Warn(format!(
                "Ignoring invalid {}: not-a-number",
                ENV_RESOURCE_TIMEOUT_SECS
            ))]
        );
    }

    #[test]
    fn test_invalid_env_log_level_is_ignored() {
        let mut diagnostics = Vec::new();
        let settings = Settings::default().override_with(
            |key| (key == ENV_LOG_LEVEL).then(|| "loud".to_string()),
            &mut diagnostics,
        );

        assert_eq!(settings.log_level, "info");
        assert_eq!(diagnostics.len(), 1);
    }

    // The only test that touches the process environment
    #[test]
    fn test_from_process_env() {
        env::set_var(ENV_BASE_URL, "http://env-test.invalid/api/");
        env::set_var(ENV_REQUEST_TIMEOUT_SECS, "7");

        let mut diagnostics = Vec::new();
        let settings = Settings::default().from_env(&mut diagnostics);
        assert_eq!(settings.base_url, "http://env-test.invalid/api/");
        assert_eq!(settings.request_timeout_secs, 7);
        assert!(diagnostics.is_empty());

        env::set_var(ENV_REQUEST_TIMEOUT_SECS, "seven");
        let settings = Settings::default().from_env(&mut diagnostics);
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::Warn(format!(
                "Ignoring invalid {}: seven",
                ENV_REQUEST_TIMEOUT_SECS
            ))]
        );

        env::remove_var(ENV_BASE_URL);
        env::remove_var(ENV_REQUEST_TIMEOUT_SECS);
    }
}
