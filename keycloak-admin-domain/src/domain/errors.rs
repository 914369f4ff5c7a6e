use thiserror::Error;

/// Errors raised by the user administration service
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {user_id} in realm {realm}")]
    UserNotFound { user_id: String, realm: String },

    #[error("User already exists: {username} in realm {realm}")]
    UserAlreadyExists { username: String, realm: String },

    #[error("Email already registered: {email} in realm {realm}")]
    EmailAlreadyExists { email: String, realm: String },

    #[error("Invalid username: {reason}")]
    InvalidUsername { reason: String },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Invalid password: {reason}")]
    InvalidPassword { reason: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Client(#[from] AdminClientError),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised by the Keycloak admin client
#[derive(Error, Debug)]
pub enum AdminClientError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("Keycloak API error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("Keycloak resource not found: {resource}")]
    NotFound { resource: String, body: String },

    #[error("Invalid request: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse Keycloak response: {message}")]
    Deserialization { message: String },
}

impl AdminClientError {
    /// HTTP status reported by Keycloak, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminClientError::Api { status, .. } => Some(*status),
            AdminClientError::NotFound { .. } => Some(404),
            AdminClientError::Authentication(AuthError::TokenRejected { status, .. }) => {
                Some(*status)
            }
            AdminClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body text, preserved verbatim
    pub fn body(&self) -> Option<&str> {
        match self {
            AdminClientError::Api { body, .. }
            | AdminClientError::NotFound { body, .. }
            | AdminClientError::Authentication(AuthError::TokenRejected { body, .. }) => {
                Some(body.as_str())
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminClientError::NotFound { .. })
    }
}

/// Result type for admin client operations
pub type ClientResult<T> = Result<T, AdminClientError>;

/// Token endpoint failures
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to authenticate with Keycloak: {status} {body}")]
    TokenRejected { status: u16, body: String },

    #[error("Token endpoint unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("Invalid token response: {reason}")]
    InvalidTokenResponse { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
