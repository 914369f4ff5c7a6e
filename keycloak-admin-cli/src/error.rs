use keycloak_admin_domain::domain::errors::{AdminClientError, ConfigError, DomainError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] AdminClientError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Telemetry(String),
}

impl CliError {
    /// Process exit code; lookups that found nothing are distinguished from
    /// other failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Domain(DomainError::UserNotFound { .. }) => 2,
            CliError::Client(err) if err.is_not_found() => 2,
            CliError::NotFound(_) => 2,
            CliError::Config(_) | CliError::InvalidArgument(_) => 64,
            CliError::Domain(
                DomainError::InvalidUsername { .. }
                | DomainError::InvalidEmail { .. }
                | DomainError::InvalidPassword { .. }
                | DomainError::Validation { .. }
                | DomainError::Client(AdminClientError::Validation { .. }),
            ) => 64,
            CliError::Client(
                AdminClientError::Validation { .. } | AdminClientError::Configuration(_),
            ) => 64,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
