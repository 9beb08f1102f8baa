use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Top-level configuration for the screening service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub notification: NotificationConfig,
    pub session_defaults: SessionDefaults,
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
            .map_err(|_| ConfigError::InvalidPort("APP_PORT"))?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let catalog_path = env::var("JOB_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH));

        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "465".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("SMTP_PORT"))?;
        let zoom_api_base =
            env::var("ZOOM_API_BASE").unwrap_or_else(|_| "https://api.zoom.us/v2".to_string());
        let zoom_oauth_url =
            env::var("ZOOM_OAUTH_URL").unwrap_or_else(|_| "https://zoom.us/oauth/token".to_string());
        for (key, value) in [("ZOOM_API_BASE", &zoom_api_base), ("ZOOM_OAUTH_URL", &zoom_oauth_url)]
        {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::InvalidUrl { key, value: value.clone() });
            }
        }

        let company_name = env::var("DEFAULT_COMPANY_NAME")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig { path: catalog_path },
            notification: NotificationConfig {
                smtp_host,
                smtp_port,
                zoom_api_base,
                zoom_oauth_url,
            },
            session_defaults: SessionDefaults { company_name },
        })
    }
}

pub const DEFAULT_CATALOG_PATH: &str = "data/job_descriptions.json";

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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the flat job description store.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

/// Endpoints for the outbound mail relay and the meeting scheduler.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub zoom_api_base: String,
    pub zoom_oauth_url: String,
}

/// Process-wide defaults copied into every new session.
#[derive(Debug, Clone, Default)]
pub struct SessionDefaults {
    pub company_name: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(&'static str),
    InvalidHost { source: std::net::AddrParseError },
    InvalidUrl { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(key) => write!(f, "{key} must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUrl { key, value } => {
                write!(f, "{key} must be an http(s) URL, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort(_) | ConfigError::InvalidUrl { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "JOB_CATALOG_PATH",
            "SMTP_HOST",
            "SMTP_PORT",
            "ZOOM_API_BASE",
            "ZOOM_OAUTH_URL",
            "DEFAULT_COMPANY_NAME",
        ] {
            env::remove_var(key);
        }
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
        assert_eq!(config.catalog.path, PathBuf::from(DEFAULT_CATALOG_PATH));
        assert_eq!(config.notification.smtp_host, "smtp.gmail.com");
        assert_eq!(config.notification.smtp_port, 465);
        assert!(config.session_defaults.company_name.is_none());
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
    fn rejects_invalid_smtp_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SMTP_PORT", "submission");
        let err = AppConfig::load().expect_err("port must parse");
        assert!(err.to_string().contains("SMTP_PORT"));
        reset_env();
    }

    #[test]
    fn rejects_non_http_scheduler_url() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ZOOM_API_BASE", "ftp://zoom.example");
        match AppConfig::load() {
            Err(ConfigError::InvalidUrl { key, .. }) => assert_eq!(key, "ZOOM_API_BASE"),
            other => panic!("expected invalid url, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn blank_company_name_is_ignored() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DEFAULT_COMPANY_NAME", "   ");
        let config = AppConfig::load().expect("config loads");
        assert!(config.session_defaults.company_name.is_none());
        reset_env();
    }
}
