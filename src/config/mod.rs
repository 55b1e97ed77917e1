use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::advisory::{AdvisoryEngine, EngineConfig, RuleTableError};
use crate::telemetry::LogFormat;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub advisory: AdvisoryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            Err(_) => LogFormat::Compact,
        };

        let latency_ms = env::var("APP_SIMULATED_LATENCY_MS")
            .unwrap_or_else(|_| "0".to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidLatency)?;
        let rules_path = env::var("APP_RULES_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            advisory: AdvisoryConfig {
                simulated_latency: Duration::from_millis(latency_ms),
                rules_path,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Engine tables and the artificial response delay.
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    pub simulated_latency: Duration,
    pub rules_path: Option<PathBuf>,
}

impl AdvisoryConfig {
    /// Reference engine unless a rules file overrides some of its tables.
    pub fn engine(&self) -> Result<AdvisoryEngine, ConfigError> {
        let Some(path) = &self.rules_path else {
            return Ok(AdvisoryEngine::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::RulesFile {
            path: path.clone(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::RulesFormat {
                path: path.clone(),
                source,
            })?;

        AdvisoryEngine::new(config).map_err(ConfigError::InvalidRules)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidLatency,
    InvalidLogFormat(String),
    RulesFile {
        path: PathBuf,
        source: std::io::Error,
    },
    RulesFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidRules(RuleTableError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLatency => {
                write!(f, "APP_SIMULATED_LATENCY_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'full', got '{value}'")
            }
            ConfigError::RulesFile { path, .. } => {
                write!(f, "unable to read rules file {}", path.display())
            }
            ConfigError::RulesFormat { path, source } => {
                write!(f, "rules file {} is malformed: {}", path.display(), source)
            }
            ConfigError::InvalidRules(err) => write!(f, "rules file rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidLatency
            | ConfigError::InvalidLogFormat(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RulesFile { source, .. } => Some(source),
            ConfigError::RulesFormat { source, .. } => Some(source),
            ConfigError::InvalidRules(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::CropProfile;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_LOG_FORMAT");
        env::remove_var("APP_SIMULATED_LATENCY_MS");
        env::remove_var("APP_RULES_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.advisory.simulated_latency, Duration::ZERO);
        assert!(config.advisory.rules_path.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_simulated_latency() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SIMULATED_LATENCY_MS", "1500");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.advisory.simulated_latency,
            Duration::from_millis(1500)
        );

        env::set_var("APP_SIMULATED_LATENCY_MS", "soon");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidLatency)));
        reset_env();
    }

    #[test]
    fn rules_file_overrides_only_supplied_sections() {
        let path = env::temp_dir().join(format!(
            "agri-advisor-rules-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{
                "crop": {
                    "tiers": [
                        {
                            "label": "any rain",
                            "conditions": [{ "metric": "rainfall", "comparison": "above", "threshold": 0.0 }],
                            "outcome": "Jute",
                            "confidence": 60.0
                        }
                    ],
                    "fallback": { "label": "dry", "outcome": "Millets", "confidence": 55.0 }
                }
            }"#,
        )
        .expect("write rules file");

        let advisory = AdvisoryConfig {
            simulated_latency: Duration::ZERO,
            rules_path: Some(path.clone()),
        };
        let engine = advisory.engine().expect("engine builds");
        std::fs::remove_file(&path).ok();

        assert_eq!(engine.config().crop.tiers()[0].outcome, CropProfile::Jute);
        assert_eq!(
            engine.config().fertilizer,
            EngineConfig::default().fertilizer
        );
    }

    #[test]
    fn rejects_rules_with_unconditional_tiers() {
        let path = env::temp_dir().join(format!(
            "agri-advisor-bad-rules-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{
                "fertilizer": {
                    "tiers": [{ "label": "always", "conditions": [], "outcome": "Urea", "confidence": 50.0 }],
                    "fallback": { "label": "default", "outcome": "17-17-17", "confidence": 50.0 }
                }
            }"#,
        )
        .expect("write rules file");

        let advisory = AdvisoryConfig {
            simulated_latency: Duration::ZERO,
            rules_path: Some(path.clone()),
        };
        let result = advisory.engine();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::InvalidRules(_))));
    }

    #[test]
    fn missing_rules_file_is_reported() {
        let advisory = AdvisoryConfig {
            simulated_latency: Duration::ZERO,
            rules_path: Some(PathBuf::from("/nonexistent/agri-advisor/rules.json")),
        };
        assert!(matches!(
            advisory.engine(),
            Err(ConfigError::RulesFile { .. })
        ));
    }
}
