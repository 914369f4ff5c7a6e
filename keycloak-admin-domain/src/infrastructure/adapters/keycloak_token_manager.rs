use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::ports::auth::*;
use crate::application::ports::config::KeycloakAdminConfig;
use crate::domain::errors::AuthError;

/// Raw token response from Keycloak; fields we don't use are ignored
#[derive(Debug, Clone, Deserialize)]
struct RawTokenResponse {
    access_token: String,
    expires_in: i64,
    token_type: Option<String>,
}

/// Acquires administrator tokens from the `master` realm token endpoint
/// using the resource-owner password grant.
pub struct KeycloakTokenManager {
    token_url: String,
    client: reqwest::Client,
}

impl KeycloakTokenManager {
    pub fn new_with_client(config: &KeycloakAdminConfig, client: reqwest::Client) -> Self {
        Self {
            token_url: config.get_token_url(ADMIN_TOKEN_REALM),
            client,
        }
    }
}

#[async_trait]
impl TokenManager for KeycloakTokenManager {
    #[instrument(skip(self, credentials), fields(client_id = %credentials.client_id))]
    async fn acquire_token(&self, credentials: &AdminCredentials) -> Result<AccessToken, AuthError> {
        let issued_at = Utc::now();

        let response = self
            .client
            .post(&self.token_url)
            .form(&credentials.form_params())
            .send()
            .await
            .map_err(|e| AuthError::Unreachable {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenRejected { status, body });
        }

        let raw_token: RawTokenResponse =
            response
                .json()
                .await
                .map_err(|e| AuthError::InvalidTokenResponse {
                    reason: e.to_string(),
                })?;

        debug!(expires_in = raw_token.expires_in, "Acquired admin token");

        AccessToken::issued_at(
            issued_at,
            raw_token.access_token,
            raw_token.expires_in,
            raw_token.token_type,
        )
    }
}
