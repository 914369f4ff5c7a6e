use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Credential type used for password credentials
pub const PASSWORD_CREDENTIAL: &str = "password";

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default page size for user listings
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// User representation exchanged with the Keycloak admin API.
///
/// Every read is a live remote fetch; nothing here is persisted locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub email_verified: bool,
    /// Epoch milliseconds, set by Keycloak
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<CredentialRepresentation>>,
}

/// Credential entry, used on user creation and password resets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRepresentation {
    #[serde(rename = "type")]
    pub type_: String,
    pub value: String,
    #[serde(default)]
    pub temporary: bool,
}

impl CredentialRepresentation {
    pub fn password(value: String, temporary: bool) -> Self {
        Self {
            type_: PASSWORD_CREDENTIAL.to_string(),
            value,
            temporary,
        }
    }
}

/// Request to create a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enabled: bool,
    pub email_verified: bool,
    pub password: Option<String>,
    pub temporary_password: bool,
}

impl NewUser {
    /// New enabled user with an unverified email and no password
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            enabled: true,
            email_verified: false,
            password: None,
            temporary_password: false,
        }
    }

    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>, temporary: bool) -> Self {
        self.password = Some(password.into());
        self.temporary_password = temporary;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_email_verified(mut self, email_verified: bool) -> Self {
        self.email_verified = email_verified;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }

    /// Body sent to `POST /users`. The password, if any, becomes a single
    /// password credential entry.
    pub fn to_representation(&self) -> KeycloakUser {
        KeycloakUser {
            id: None,
            username: self.username.clone(),
            email: Some(self.email.clone()),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            enabled: self.enabled,
            email_verified: self.email_verified,
            created_timestamp: None,
            credentials: self.password.as_ref().map(|password| {
                vec![CredentialRepresentation::password(
                    password.clone(),
                    self.temporary_password,
                )]
            }),
        }
    }
}

/// Partial user update; only the fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
}

impl UserUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.enabled.is_none()
            && self.email_verified.is_none()
    }
}

/// Offset pagination for user listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub first: u32,
    pub max: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            first: 0,
            max: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(first: Option<u32>, max: Option<u32>) -> Self {
        let defaults = Self::default();
        Self {
            first: first.unwrap_or(defaults.first),
            max: max.unwrap_or(defaults.max),
        }
    }
}

/// One page of users together with the pagination that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPage {
    pub users: Vec<KeycloakUser>,
    pub first: u32,
    pub max: u32,
    pub count: usize,
}

pub fn validate_username(username: &str) -> DomainResult<()> {
    if username.trim().is_empty() {
        return Err(DomainError::InvalidUsername {
            reason: "Username cannot be empty".to_string(),
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidUsername {
            reason: "Username cannot contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Accepts `local@domain.tld` shaped addresses without whitespace
pub fn validate_email(email: &str) -> DomainResult<()> {
    let invalid = || DomainError::InvalidEmail {
        email: email.to_string(),
    };

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !has_inner_dot {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.is_empty() {
        return Err(DomainError::InvalidPassword {
            reason: "Password is required".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::InvalidPassword {
            reason: format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_user_bundles_password_as_single_credential() {
        let user = NewUser::new("alice", "alice@example.com")
            .with_names(Some("Alice".to_string()), None)
            .with_password("s3cret-pass", true);

        let body = serde_json::to_value(user.to_representation()).unwrap();
        assert_eq!(
            body,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "firstName": "Alice",
                "enabled": true,
                "emailVerified": false,
                "credentials": [
                    { "type": "password", "value": "s3cret-pass", "temporary": true }
                ]
            })
        );
    }

    #[test]
    fn new_user_without_password_omits_credentials() {
        let body = serde_json::to_value(NewUser::new("bob", "bob@example.com").to_representation())
            .unwrap();
        assert!(body.get("credentials").is_none());
        assert!(body.get("id").is_none());
    }

    #[test]
    fn user_update_serializes_only_set_fields() {
        let body = serde_json::to_value(UserUpdate::enabled(false)).unwrap();
        assert_eq!(body, json!({ "enabled": false }));
        assert!(UserUpdate::default().is_empty());
        assert!(!UserUpdate::enabled(true).is_empty());
    }

    #[test]
    fn remote_user_tolerates_missing_optional_fields() {
        let user: KeycloakUser = serde_json::from_value(json!({
            "id": "abc-123",
            "username": "carol",
            "enabled": true,
            "createdTimestamp": 1_700_000_000_000_i64,
            "totp": false
        }))
        .unwrap();

        assert_eq!(user.id.as_deref(), Some("abc-123"));
        assert_eq!(user.email, None);
        assert!(!user.email_verified);
        assert_eq!(user.created_timestamp, Some(1_700_000_000_000));
    }

    #[test]
    fn pagination_defaults() {
        assert_eq!(Pagination::default(), Pagination { first: 0, max: 100 });
        assert_eq!(Pagination::new(Some(20), None), Pagination { first: 20, max: 100 });
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user@example").is_err());
        assert!(validate_email("user@.com").is_err());
        assert!(validate_email("user@example.").is_err());
        assert!(validate_email("us er@example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn password_validation() {
        assert!(matches!(
            validate_password(""),
            Err(DomainError::InvalidPassword { .. })
        ));
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }
}
