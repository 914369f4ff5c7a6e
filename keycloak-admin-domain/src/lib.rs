/*!
# Keycloak Admin Domain

Typed client for the Keycloak realm user administration API, laid out
along hexagonal architecture lines.

This crate provides:
- User DTOs and request shapes for the admin REST API
- Port definitions for token acquisition and user storage
- A user management service applying the dashboard's business rules
- reqwest adapters: a password-grant token manager and the admin client

## Architecture

```text
┌─────────────────────────────────────────────────────────────┐
│                Application Layer                            │
├─────────────────────────────────────────────────────────────┤
│  • UserManagementService                                    │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                 Ports                                       │
├─────────────────────────────────────────────────────────────┤
│  • UserRepository   • TokenManager   • ConfigurationPort    │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│              Infrastructure Layer (Adapters)                │
├─────────────────────────────────────────────────────────────┤
│  • KeycloakAdminClient      • KeycloakTokenManager          │
│  • EnvConfigurationAdapter                                  │
└─────────────────────────────────────────────────────────────┘
```

## Token lifecycle

The admin client caches one bearer token. Before each operation the token
is reused when it is valid for more than 30 more seconds; otherwise a new
one is requested from the `master` realm token endpoint. There is no
background refresh and no single-flight: concurrent operations may each
request a token and the last one stored wins.

## Usage

```rust,no_run
use std::sync::Arc;
use keycloak_admin_domain::{
    KeycloakAdminClient, NewUser, Pagination, UserManagementService,
};

# async fn run() -> Result<(), keycloak_admin_domain::DomainError> {
let client = KeycloakAdminClient::from_env()?;
let users = UserManagementService::new(Arc::new(client));

let page = users.list_users(Pagination::default()).await?;
let created = users
    .create_user(&NewUser::new("alice", "alice@example.com").with_password("initial-pw", true))
    .await?;
# Ok(())
# }
```
*/

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::ports::*;
pub use application::services::*;
pub use domain::entities::*;
pub use domain::errors::*;
pub use infrastructure::adapters::*;
