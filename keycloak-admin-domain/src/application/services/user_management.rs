use crate::{
    application::ports::UserRepository,
    domain::{
        entities::*,
        errors::{AdminClientError, DomainError, DomainResult},
    },
};
use std::sync::Arc;
use tracing::{info, instrument};

/// User administration use cases used by the admin dashboard.
///
/// Remote 404s are mapped to [`DomainError::UserNotFound`] for every
/// operation, so callers never need a separate existence check.
#[derive(Clone)]
pub struct UserManagementService {
    repository: Arc<dyn UserRepository>,
}

impl UserManagementService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    fn realm(&self) -> &str {
        self.repository.realm()
    }

    fn map_not_found(&self, user_id: &str, err: AdminClientError) -> DomainError {
        if err.is_not_found() {
            DomainError::UserNotFound {
                user_id: user_id.to_string(),
                realm: self.realm().to_string(),
            }
        } else {
            err.into()
        }
    }

    /// List one page of users
    #[instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn list_users(&self, page: Pagination) -> DomainResult<UserPage> {
        let users = self.repository.list_users(page).await?;

        info!("Found {} users in realm '{}'", users.len(), self.realm());
        Ok(UserPage {
            count: users.len(),
            users,
            first: page.first,
            max: page.max,
        })
    }

    pub async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.repository.count_users().await?)
    }

    /// Get a specific user by ID
    #[instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn get_user(&self, user_id: &str) -> DomainResult<KeycloakUser> {
        require_user_id(user_id)?;

        self.repository
            .get_user_by_id(user_id)
            .await
            .map_err(|e| self.map_not_found(user_id, e))
    }

    /// Find a user by exact username
    #[instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn find_user_by_username(&self, username: &str) -> DomainResult<Option<KeycloakUser>> {
        validate_username(username)?;

        let users = self.repository.get_users_by_username(username).await?;
        Ok(users.into_iter().next())
    }

    /// Create a new user and return it as stored by Keycloak
    #[instrument(skip(self, request), fields(realm = %self.realm(), username = %request.username))]
    pub async fn create_user(&self, request: &NewUser) -> DomainResult<KeycloakUser> {
        request.validate()?;

        if !self
            .repository
            .get_users_by_username(&request.username)
            .await?
            .is_empty()
        {
            return Err(DomainError::UserAlreadyExists {
                username: request.username.clone(),
                realm: self.realm().to_string(),
            });
        }

        if !self
            .repository
            .get_users_by_email(&request.email)
            .await?
            .is_empty()
        {
            return Err(DomainError::EmailAlreadyExists {
                email: request.email.clone(),
                realm: self.realm().to_string(),
            });
        }

        let user_id = self.repository.create_user(request).await?;
        info!("Created user '{}' ({})", request.username, user_id);

        self.get_user(&user_id).await
    }

    /// Apply a partial update and return the updated user
    #[instrument(skip(self, update), fields(realm = %self.realm()))]
    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> DomainResult<KeycloakUser> {
        require_user_id(user_id)?;

        if update.is_empty() {
            return Err(DomainError::Validation {
                field: "update".to_string(),
                message: "No fields to update".to_string(),
            });
        }

        if let Some(email) = &update.email {
            validate_email(email)?;
        }

        self.repository
            .update_user(user_id, update)
            .await
            .map_err(|e| self.map_not_found(user_id, e))?;

        self.get_user(user_id).await
    }

    #[instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn delete_user(&self, user_id: &str) -> DomainResult<()> {
        require_user_id(user_id)?;

        self.repository
            .delete_user(user_id)
            .await
            .map_err(|e| self.map_not_found(user_id, e))?;

        info!("Deleted user '{}' from realm '{}'", user_id, self.realm());
        Ok(())
    }

    /// Replace a user's password. Temporary passwords must be changed at
    /// next login.
    #[instrument(skip(self, password), fields(realm = %self.realm()))]
    pub async fn reset_password(
        &self,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> DomainResult<()> {
        require_user_id(user_id)?;
        validate_password(password)?;

        self.repository
            .reset_password(user_id, password, temporary)
            .await
            .map_err(|e| self.map_not_found(user_id, e))
    }

    #[instrument(skip(self), fields(realm = %self.realm()))]
    pub async fn set_user_enabled(&self, user_id: &str, enabled: bool) -> DomainResult<()> {
        require_user_id(user_id)?;

        self.repository
            .set_user_enabled(user_id, enabled)
            .await
            .map_err(|e| self.map_not_found(user_id, e))
    }
}

fn require_user_id(user_id: &str) -> DomainResult<()> {
    if user_id.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "user_id".to_string(),
            message: "User ID is required".to_string(),
        });
    }
    Ok(())
}
