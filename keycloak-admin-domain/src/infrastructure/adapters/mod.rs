pub mod env_config;
pub mod keycloak_admin_client;
pub mod keycloak_token_manager;

pub use env_config::*;
pub use keycloak_admin_client::*;
pub use keycloak_token_manager::*;
