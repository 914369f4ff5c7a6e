use async_trait::async_trait;
use keycloak_admin_domain::{
    application::ports::repository::UserRepository,
    domain::{
        entities::*,
        errors::{AdminClientError, ClientResult},
    },
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory user repository for service tests
pub struct MockUserRepository {
    pub realm: String,
    pub users: Arc<Mutex<BTreeMap<String, KeycloakUser>>>, // id -> user
    pub passwords: Arc<Mutex<BTreeMap<String, (String, bool)>>>, // id -> (password, temporary)
    pub calls: Arc<Mutex<Vec<String>>>,
    pub user_counter: Arc<Mutex<u32>>,
    pub fail_with_status: Arc<Mutex<Option<u16>>>, // For testing error scenarios
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            realm: "website".to_string(),
            users: Arc::new(Mutex::new(BTreeMap::new())),
            passwords: Arc::new(Mutex::new(BTreeMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            user_counter: Arc::new(Mutex::new(0)),
            fail_with_status: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_user(self, id: &str, username: &str, email: &str) -> Self {
        self.users.lock().unwrap().insert(
            id.to_string(),
            KeycloakUser {
                id: Some(id.to_string()),
                username: username.to_string(),
                email: Some(email.to_string()),
                enabled: true,
                ..Default::default()
            },
        );
        self
    }

    pub fn fail_with_status(&self, status: u16) {
        *self.fail_with_status.lock().unwrap() = Some(status);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn user(&self, id: &str) -> Option<KeycloakUser> {
        self.users.lock().unwrap().get(id).cloned()
    }

    fn record(&self, call: &str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        match *self.fail_with_status.lock().unwrap() {
            Some(status) => Err(AdminClientError::Api {
                status,
                body: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn not_found(user_id: &str) -> AdminClientError {
        AdminClientError::NotFound {
            resource: format!("/users/{user_id}"),
            body: r#"{"error":"User not found"}"#.to_string(),
        }
    }

    fn generate_user_id(&self) -> String {
        let mut counter = self.user_counter.lock().unwrap();
        *counter += 1;
        format!("user-{}", counter)
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    fn realm(&self) -> &str {
        &self.realm
    }

    async fn create_user(&self, user: &NewUser) -> ClientResult<String> {
        self.record("create_user")?;
        let id = self.generate_user_id();
        let mut representation = user.to_representation();
        representation.id = Some(id.clone());
        if let Some(password) = &user.password {
            self.passwords
                .lock()
                .unwrap()
                .insert(id.clone(), (password.clone(), user.temporary_password));
        }
        representation.credentials = None;
        self.users.lock().unwrap().insert(id.clone(), representation);
        Ok(id)
    }

    async fn get_user_by_id(&self, user_id: &str) -> ClientResult<KeycloakUser> {
        self.record("get_user_by_id")?;
        self.user(user_id).ok_or_else(|| Self::not_found(user_id))
    }

    async fn get_users_by_username(&self, username: &str) -> ClientResult<Vec<KeycloakUser>> {
        self.record("get_users_by_username")?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.username == username)
            .cloned()
            .collect())
    }

    async fn get_users_by_email(&self, email: &str) -> ClientResult<Vec<KeycloakUser>> {
        self.record("get_users_by_email")?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn list_users(&self, page: Pagination) -> ClientResult<Vec<KeycloakUser>> {
        self.record("list_users")?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .skip(page.first as usize)
            .take(page.max as usize)
            .cloned()
            .collect())
    }

    async fn count_users(&self) -> ClientResult<u64> {
        self.record("count_users")?;
        Ok(self.users.lock().unwrap().len() as u64)
    }

    async fn update_user(&self, user_id: &str, update: &UserUpdate) -> ClientResult<()> {
        self.record("update_user")?;
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(user_id).ok_or_else(|| Self::not_found(user_id))?;
        if let Some(email) = &update.email {
            user.email = Some(email.clone());
        }
        if let Some(first_name) = &update.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(enabled) = update.enabled {
            user.enabled = enabled;
        }
        if let Some(email_verified) = update.email_verified {
            user.email_verified = email_verified;
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> ClientResult<()> {
        self.record("delete_user")?;
        self.users
            .lock()
            .unwrap()
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(user_id))
    }

    async fn reset_password(
        &self,
        user_id: &str,
        password: &str,
        temporary: bool,
    ) -> ClientResult<()> {
        self.record("reset_password")?;
        if !self.users.lock().unwrap().contains_key(user_id) {
            return Err(Self::not_found(user_id));
        }
        self.passwords
            .lock()
            .unwrap()
            .insert(user_id.to_string(), (password.to_string(), temporary));
        Ok(())
    }
}
