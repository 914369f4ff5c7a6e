use crate::application::ports::{
    AppConfig, ConfigurationPort, HttpConfig, KeycloakAdminConfig, LoggingConfig,
};
use crate::domain::errors::ConfigError;

/// Environment-based configuration adapter
pub struct EnvConfigurationAdapter {
    config: AppConfig,
}

impl EnvConfigurationAdapter {
    pub fn new() -> Result<Self, ConfigError> {
        let config = AppConfig::from_env()?;
        Ok(Self { config })
    }
}

impl From<AppConfig> for EnvConfigurationAdapter {
    fn from(config: AppConfig) -> Self {
        Self { config }
    }
}

impl ConfigurationPort for EnvConfigurationAdapter {
    fn get_keycloak_config(&self) -> &KeycloakAdminConfig {
        &self.config.keycloak
    }

    fn get_http_config(&self) -> &HttpConfig {
        &self.config.http
    }

    fn get_logging_config(&self) -> &LoggingConfig {
        &self.config.logging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_exposes_each_section() {
        let config = AppConfig::from_lookup(|key| match key {
            "KEYCLOAK_ADMIN_URL" => Some("https://sso.example.com".to_string()),
            "KEYCLOAK_REALM" => Some("website".to_string()),
            "KEYCLOAK_ADMIN" => Some("admin".to_string()),
            "KEYCLOAK_ADMIN_PASSWORD" => Some("admin-pw".to_string()),
            "HTTP_TIMEOUT_SECONDS" => Some("12".to_string()),
            _ => None,
        })
        .unwrap();
        let adapter = EnvConfigurationAdapter::from(config);

        assert_eq!(adapter.get_keycloak_config().realm, "website");
        assert_eq!(adapter.get_http_config().timeout_seconds, 12);
        assert_eq!(
            adapter.get_keycloak_config().get_token_url("master"),
            "https://sso.example.com/realms/master/protocol/openid-connect/token"
        );
    }
}
