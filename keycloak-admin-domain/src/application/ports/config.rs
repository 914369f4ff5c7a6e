use crate::application::ports::auth::{DEFAULT_ADMIN_CLIENT_ID, REDACTED};
use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "KEYCLOAK_ADMIN_URL";
pub const ENV_REALM: &str = "KEYCLOAK_REALM";
pub const ENV_ADMIN_USERNAME: &str = "KEYCLOAK_ADMIN";
pub const ENV_ADMIN_PASSWORD: &str = "KEYCLOAK_ADMIN_PASSWORD";
pub const ENV_CLIENT_ID: &str = "KEYCLOAK_ADMIN_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "KEYCLOAK_ADMIN_CLIENT_SECRET";

/// Configuration port for accessing application configuration
pub trait ConfigurationPort: Send + Sync {
    /// Get Keycloak connection configuration
    fn get_keycloak_config(&self) -> &KeycloakAdminConfig;

    /// Get HTTP client configuration
    fn get_http_config(&self) -> &HttpConfig;

    /// Get logging configuration
    fn get_logging_config(&self) -> &LoggingConfig;
}

/// Connection parameters for the Keycloak admin API
#[derive(Clone, Serialize, Deserialize)]
pub struct KeycloakAdminConfig {
    pub base_url: String,
    pub realm: String,
    pub admin_username: String,
    pub admin_password: String,
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl KeycloakAdminConfig {
    pub fn new(
        base_url: impl Into<String>,
        realm: impl Into<String>,
        admin_username: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            realm: realm.into(),
            admin_username: admin_username.into(),
            admin_password: admin_password.into(),
            client_id: DEFAULT_ADMIN_CLIENT_ID.to_string(),
            client_secret: None,
        }
    }

    pub fn with_client(mut self, client_id: impl Into<String>, client_secret: Option<String>) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: ENV_BASE_URL.to_string(),
            });
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: ENV_BASE_URL.to_string(),
                message: "Must start with http:// or https://".to_string(),
            });
        }

        if self.realm.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: ENV_REALM.to_string(),
            });
        }

        if self.admin_username.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: ENV_ADMIN_USERNAME.to_string(),
            });
        }

        if self.admin_password.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: ENV_ADMIN_PASSWORD.to_string(),
            });
        }

        if self.client_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: ENV_CLIENT_ID.to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn get_admin_url(&self) -> String {
        format!("{}/admin/realms/{}", self.base_url, self.realm)
    }

    /// Token endpoint of `token_realm`; administrator tokens always come
    /// from [`ADMIN_TOKEN_REALM`](crate::application::ports::ADMIN_TOKEN_REALM)
    pub fn get_token_url(&self, token_realm: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, token_realm
        )
    }
}

impl fmt::Debug for KeycloakAdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeycloakAdminConfig")
            .field("base_url", &self.base_url)
            .field("realm", &self.realm)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &REDACTED)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            user_agent: concat!("keycloak-admin-domain/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HTTP_TIMEOUT_SECONDS".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HTTP_CONNECT_TIMEOUT_SECONDS".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Build a reqwest client honouring these settings
    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.get_timeout())
            .connect_timeout(self.get_connect_timeout())
            .user_agent(self.user_agent.clone())
            .build()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub keycloak: KeycloakAdminConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.keycloak.validate()?;
        self.http.validate()?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| ConfigError::MissingRequired {
                key: key.to_string(),
            })
        };

        let keycloak = KeycloakAdminConfig::new(
            required(ENV_BASE_URL)?,
            required(ENV_REALM)?,
            required(ENV_ADMIN_USERNAME)?,
            required(ENV_ADMIN_PASSWORD)?,
        )
        .with_client(
            get(ENV_CLIENT_ID).unwrap_or_else(|| DEFAULT_ADMIN_CLIENT_ID.to_string()),
            get(ENV_CLIENT_SECRET),
        );

        let defaults = HttpConfig::default();
        let http = HttpConfig {
            timeout_seconds: parse_or(&get, "HTTP_TIMEOUT_SECONDS", defaults.timeout_seconds)?,
            connect_timeout_seconds: parse_or(
                &get,
                "HTTP_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout_seconds,
            )?,
            user_agent: get("HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
        };

        let logging = LoggingConfig {
            level: parse_or(&get, "LOG_LEVEL", LogLevel::default())?,
            format: parse_or(&get, "LOG_FORMAT", LogFormat::default())?,
        };

        let config = AppConfig {
            keycloak,
            http,
            logging,
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// String parsing implementations
impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {s}")),
        }
    }
}
