use crate::application::ports::config::KeycloakAdminConfig;
use crate::domain::errors::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens are treated as expired this many seconds before their real expiry
pub const TOKEN_SAFETY_MARGIN_SECONDS: i64 = 30;

/// Public client shipped with every Keycloak installation
pub const DEFAULT_ADMIN_CLIENT_ID: &str = "admin-cli";

/// Realm whose token endpoint issues administrator tokens
pub const ADMIN_TOKEN_REALM: &str = "master";

/// Stand-in printed for secrets in `Debug` output
pub(crate) const REDACTED: &str = "[redacted]";

/// Bearer token with an absolute expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

impl AccessToken {
    /// Token whose lifetime of `expires_in` seconds started at `issued_at`.
    ///
    /// `expires_in` comes straight from the token endpoint, so negative or
    /// out-of-range lifetimes are reported instead of overflowing.
    pub fn issued_at(
        issued_at: DateTime<Utc>,
        access_token: String,
        expires_in: i64,
        token_type: Option<String>,
    ) -> Result<Self, AuthError> {
        if expires_in < 0 {
            return Err(AuthError::InvalidTokenResponse {
                reason: format!("negative expires_in: {expires_in}"),
            });
        }

        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::InvalidTokenResponse {
                reason: format!("expires_in out of range: {expires_in}"),
            })?;

        Ok(Self {
            access_token,
            expires_at,
            token_type: token_type.unwrap_or_else(|| "Bearer".to_string()),
        })
    }

    pub fn is_usable(&self) -> bool {
        self.is_usable_at(Utc::now())
    }

    /// Usable iff `now < expires_at - safety margin`
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        match self
            .expires_at
            .checked_sub_signed(Duration::seconds(TOKEN_SAFETY_MARGIN_SECONDS))
        {
            Some(usable_until) => now < usable_until,
            None => false,
        }
    }
}

/// Administrator credentials for the resource-owner password grant
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl AdminCredentials {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            client_id: DEFAULT_ADMIN_CLIENT_ID.to_string(),
            client_secret: None,
        }
    }

    pub fn with_client(mut self, client_id: String, client_secret: Option<String>) -> Self {
        self.client_id = client_id;
        self.client_secret = client_secret;
        self
    }

    /// Form fields posted to the token endpoint
    pub fn form_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];
        if let Some(secret) = &self.client_secret {
            params.push(("client_secret", secret.as_str()));
        }
        params
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| REDACTED))
            .finish()
    }
}

impl From<&KeycloakAdminConfig> for AdminCredentials {
    fn from(config: &KeycloakAdminConfig) -> Self {
        AdminCredentials::new(config.admin_username.clone(), config.admin_password.clone())
            .with_client(config.client_id.clone(), config.client_secret.clone())
    }
}

/// Token management port
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Acquire a new token using credentials
    async fn acquire_token(&self, credentials: &AdminCredentials) -> Result<AccessToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_unusable_inside_safety_margin() {
        let issued = Utc::now();
        let token = AccessToken::issued_at(issued, "t".to_string(), 300, None).unwrap();

        assert!(token.is_usable_at(issued));
        assert!(token.is_usable_at(issued + Duration::seconds(269)));
        assert!(!token.is_usable_at(issued + Duration::seconds(270)));
        assert!(!token.is_usable_at(issued + Duration::seconds(300)));
        assert_eq!(token.token_type, "Bearer");
    }

    #[test]
    fn short_lived_token_is_never_usable() {
        let issued = Utc::now();
        let token =
            AccessToken::issued_at(issued, "t".to_string(), TOKEN_SAFETY_MARGIN_SECONDS, None)
                .unwrap();
        assert!(!token.is_usable_at(issued));
    }

    #[test]
    fn rejects_negative_and_overflowing_lifetimes() {
        let issued = Utc::now();
        for expires_in in [-1, i64::MAX, i64::MAX / 1000] {
            assert!(matches!(
                AccessToken::issued_at(issued, "t".to_string(), expires_in, None),
                Err(AuthError::InvalidTokenResponse { .. })
            ));
        }
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = AdminCredentials::new("admin".to_string(), "hunter2-pw".to_string())
            .with_client("dashboard".to_string(), Some("client-secret".to_string()));
        let printed = format!("{creds:?}");

        assert!(printed.contains("admin"));
        assert!(printed.contains("dashboard"));
        assert!(!printed.contains("hunter2-pw"));
        assert!(!printed.contains("client-secret"));
    }

    #[test]
    fn form_params_include_secret_only_when_set() {
        let creds = AdminCredentials::new("admin".to_string(), "pw".to_string());
        let params = creds.form_params();
        assert_eq!(
            params,
            vec![
                ("grant_type", "password"),
                ("client_id", "admin-cli"),
                ("username", "admin"),
                ("password", "pw"),
            ]
        );

        let creds = creds.with_client("dashboard".to_string(), Some("shh".to_string()));
        let params = creds.form_params();
        assert!(params.contains(&("client_id", "dashboard")));
        assert!(params.contains(&("client_secret", "shh")));
    }
}
