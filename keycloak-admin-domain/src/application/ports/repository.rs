use crate::domain::{
    entities::{KeycloakUser, NewUser, Pagination, UserUpdate},
    errors::ClientResult,
};
use async_trait::async_trait;

/// Realm-scoped user management port
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Realm the repository operates on
    fn realm(&self) -> &str;

    /// Create a user and return its identifier
    async fn create_user(&self, user: &NewUser) -> ClientResult<String>;

    async fn get_user_by_id(&self, user_id: &str) -> ClientResult<KeycloakUser>;

    /// Exact-match username search; no match yields an empty list
    async fn get_users_by_username(&self, username: &str) -> ClientResult<Vec<KeycloakUser>>;

    /// Exact-match email search; no match yields an empty list
    async fn get_users_by_email(&self, email: &str) -> ClientResult<Vec<KeycloakUser>>;

    async fn list_users(&self, page: Pagination) -> ClientResult<Vec<KeycloakUser>>;

    async fn count_users(&self) -> ClientResult<u64>;

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> ClientResult<()>;

    async fn delete_user(&self, user_id: &str) -> ClientResult<()>;

    async fn reset_password(
        &self,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> ClientResult<()>;

    async fn set_user_enabled(&self, user_id: &str, enabled: bool) -> ClientResult<()> {
        self.update_user(user_id, &UserUpdate::enabled(enabled)).await
    }
}
