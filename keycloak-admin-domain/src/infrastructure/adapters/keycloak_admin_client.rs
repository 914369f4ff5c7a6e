use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::{
    AccessToken, AdminCredentials, AppConfig, HttpConfig, KeycloakAdminConfig, TokenManager,
    UserRepository,
};
use crate::domain::{
    entities::{CredentialRepresentation, KeycloakUser, NewUser, Pagination, UserUpdate},
    errors::{AdminClientError, ClientResult},
};
use crate::infrastructure::adapters::KeycloakTokenManager;

/// Outcome of an authenticated admin API call before body decoding
#[derive(Debug)]
enum AdminResponse {
    /// 204, nothing to parse
    NoContent,
    /// 201, id taken from the `Location` header when present
    Created { id: Option<String> },
    Body(String),
}

/// Client for the realm-scoped Keycloak user admin API.
///
/// Holds a cached bearer token that is refreshed lazily at the start of an
/// operation once it falls inside the expiry safety margin. Concurrent
/// operations may each refresh; the last token written wins.
pub struct KeycloakAdminClient<TM: TokenManager = KeycloakTokenManager> {
    config: KeycloakAdminConfig,
    credentials: AdminCredentials,
    http: reqwest::Client,
    token_manager: TM,
    token: RwLock<Option<AccessToken>>,
}

impl KeycloakAdminClient<KeycloakTokenManager> {
    /// Client with default HTTP settings
    pub fn new(config: KeycloakAdminConfig) -> ClientResult<Self> {
        Self::with_http_config(config, &HttpConfig::default())
    }

    pub fn with_http_config(config: KeycloakAdminConfig, http: &HttpConfig) -> ClientResult<Self> {
        config.validate()?;
        http.validate()?;
        let client = http.build_client()?;
        let token_manager = KeycloakTokenManager::new_with_client(&config, client.clone());
        Self::with_token_manager(config, client, token_manager)
    }

    pub fn from_app_config(config: &AppConfig) -> ClientResult<Self> {
        Self::with_http_config(config.keycloak.clone(), &config.http)
    }

    /// Client configured from `KEYCLOAK_ADMIN_URL`, `KEYCLOAK_REALM`,
    /// `KEYCLOAK_ADMIN` and `KEYCLOAK_ADMIN_PASSWORD`
    pub fn from_env() -> ClientResult<Self> {
        Self::from_app_config(&AppConfig::from_env()?)
    }
}

impl<TM: TokenManager> KeycloakAdminClient<TM> {
    pub fn with_token_manager(
        config: KeycloakAdminConfig,
        http: reqwest::Client,
        token_manager: TM,
    ) -> ClientResult<Self> {
        config.validate()?;
        let credentials = AdminCredentials::from(&config);
        Ok(Self {
            config,
            credentials,
            http,
            token_manager,
            token: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &KeycloakAdminConfig {
        &self.config
    }

    /// Returns a usable bearer token, authenticating when the cache is
    /// empty or the cached token is inside the safety margin.
    async fn bearer_token(&self) -> ClientResult<String> {
        let cached = self.token.read().await.clone();
        if let Some(token) = cached.filter(AccessToken::is_usable) {
            debug!("Reusing cached admin token");
            return Ok(token.access_token);
        }

        debug!("Admin token missing or about to expire, authenticating");
        let token = self.token_manager.acquire_token(&self.credentials).await?;
        let access_token = token.access_token.clone();
        *self.token.write().await = Some(token);
        Ok(access_token)
    }

    #[instrument(skip(self, query, body), fields(realm = %self.config.realm))]
    async fn send<B>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ClientResult<AdminResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        let token = self.bearer_token().await?;
        let url = format!("{}{}", self.config.get_admin_url(), endpoint);

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(AdminResponse::NoContent);
        }

        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminClientError::NotFound {
                resource: endpoint.to_string(),
                body,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::CREATED {
            let id = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(created_id_from_location);
            return Ok(AdminResponse::Created { id });
        }

        Ok(AdminResponse::Body(response.text().await?))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let response = self.send(Method::GET, endpoint, query, None::<&()>).await?;
        match response {
            AdminResponse::Body(text) => {
                serde_json::from_str(&text).map_err(|e| AdminClientError::Deserialization {
                    message: format!("{endpoint}: {e}"),
                })
            }
            AdminResponse::NoContent | AdminResponse::Created { .. } => {
                Err(AdminClientError::Deserialization {
                    message: format!("{endpoint}: empty response body"),
                })
            }
        }
    }
}

/// Last path segment of a `Location` header, e.g.
/// `.../admin/realms/website/users/abc-123` yields `abc-123`.
pub fn created_id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .map(str::to_string)
}

fn require(field: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(AdminClientError::Validation {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Identifiers are interpolated into the path, so they must stay a single
/// segment that no URL parser will normalise away. Percent escapes are
/// refused outright since `%2e%2e` resolves like `..`.
fn require_id(user_id: &str) -> ClientResult<()> {
    require("user_id", user_id)?;
    let reason = if matches!(user_id, "." | "..") {
        Some("must not be a dot segment")
    } else if user_id.contains(['/', '\\', '?', '#', '%']) {
        Some("must be a single path segment")
    } else if user_id.chars().any(|c| c.is_control() || c.is_whitespace()) {
        Some("must not contain whitespace or control characters")
    } else {
        None
    };

    match reason {
        Some(message) => Err(AdminClientError::Validation {
            field: "user_id".to_string(),
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl<TM: TokenManager> UserRepository for KeycloakAdminClient<TM> {
    fn realm(&self) -> &str {
        &self.config.realm
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> ClientResult<String> {
        require("username", &user.username)?;

        let representation = user.to_representation();
        let response = self
            .send(Method::POST, "/users", &[], Some(&representation))
            .await?;

        if let AdminResponse::Created { id: Some(id) } = response {
            info!(user_id = %id, "Created user");
            return Ok(id);
        }

        // Keycloak normally answers with a Location header; look the user up
        // by exact username when it does not.
        warn!("User created without Location header, resolving id by username");
        let id = self
            .get_users_by_username(&user.username)
            .await?
            .into_iter()
            .find_map(|u| u.id)
            .ok_or_else(|| AdminClientError::NotFound {
                resource: format!("/users?username={}", user.username),
                body: "User created but could not retrieve user ID".to_string(),
            })?;

        info!(user_id = %id, "Created user");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, user_id: &str) -> ClientResult<KeycloakUser> {
        require_id(user_id)?;
        self.get_json(&format!("/users/{user_id}"), &[]).await
    }

    #[instrument(skip(self))]
    async fn get_users_by_username(&self, username: &str) -> ClientResult<Vec<KeycloakUser>> {
        require("username", username)?;
        self.get_json(
            "/users",
            &[("username", username.to_string()), ("exact", "true".to_string())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_users_by_email(&self, email: &str) -> ClientResult<Vec<KeycloakUser>> {
        require("email", email)?;
        self.get_json(
            "/users",
            &[("email", email.to_string()), ("exact", "true".to_string())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_users(&self, page: Pagination) -> ClientResult<Vec<KeycloakUser>> {
        self.get_json(
            "/users",
            &[("first", page.first.to_string()), ("max", page.max.to_string())],
        )
        .await
    }

    async fn count_users(&self) -> ClientResult<u64> {
        self.get_json("/users/count", &[]).await
    }

    #[instrument(skip(self, update))]
    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> ClientResult<()> {
        require_id(user_id)?;
        self.send(Method::PUT, &format!("/users/{user_id}"), &[], Some(update))
            .await?;
        info!("Updated user");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: &str) -> ClientResult<()> {
        require_id(user_id)?;
        self.send(Method::DELETE, &format!("/users/{user_id}"), &[], None::<&()>)
            .await?;
        info!("Deleted user");
        Ok(())
    }

    #[instrument(skip(self, password))]
    async fn reset_password(
        &self,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> ClientResult<()> {
        require_id(user_id)?;
        let credential = CredentialRepresentation::password(password.to_string(), temporary);
        self.send(
            Method::PUT,
            &format!("/users/{user_id}/reset-password"),
            &[],
            Some(&credential),
        )
        .await?;
        info!("Reset user password");
        Ok(())
    }
}
