use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::auth::password::{hash_password, verify_password, PasswordError};
use crate::auth::{generate_jwt, Claims, Role};
use crate::config::AppConfig;
use crate::database::{with_deadline, UserRepository};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::AuthUser;

const INVALID_CREDENTIALS: &str = "Username atau password salah";

/// Hashed once and checked against when no single account matches, so a miss
/// costs the same bcrypt round as a wrong password
const MISS_PASSWORD: &str = "alumni-login-miss";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    config: Arc<AppConfig>,
    miss_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: Arc<AppConfig>) -> Self {
        Self {
            users,
            config,
            miss_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn burn_miss_round(&self, password: &str) -> Result<(), PasswordError> {
        let hash = self.miss_hash.get_or_try_init(|| hash_password(MISS_PASSWORD)).await?;
        verify_password(password, hash).await?;
        Ok(())
    }

    fn deadline(&self) -> Duration {
        self.config.request_timeout()
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(ApiError::bad_request("Username dan password harus diisi"));
        }

        let mut users = with_deadline(self.deadline(), self.users.find_by_login(&request.username)).await?;
        if users.len() != 1 {
            warn!("Login failed for '{}': {} matching accounts", request.username, users.len());
            self.burn_miss_round(&request.password).await?;
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        let user = users.remove(0);

        if !verify_password(&request.password, &user.password_hash).await? {
            warn!("Login failed for '{}': wrong password", request.username);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let role = user.role().ok_or_else(|| {
            error!("User {} has unrecognised role '{}'", user.id, user.role);
            ApiError::unauthorized(INVALID_CREDENTIALS)
        })?;

        let claims = Claims::new(user.id, user.username.clone(), role, self.config.security.jwt_expiry_hours);
        let token = generate_jwt(&claims, &self.config.security.jwt_secret)?;

        info!("User {} logged in as {}", user.username, role);
        Ok(LoginResponse { user, token })
    }

    pub fn profile(&self, caller: &AuthUser) -> Profile {
        Profile {
            user_id: caller.user_id,
            username: caller.username.clone(),
            role: caller.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, TEST_JWT_SECRET};

    fn service(store: Arc<MemoryStore>) -> AuthService {
        let mut config = AppConfig::development();
        config.security.jwt_secret = TEST_JWT_SECRET.to_string();
        AuthService::new(store, Arc::new(config))
    }

    #[tokio::test]
    async fn unknown_account_still_pays_a_bcrypt_round() {
        let service = service(Arc::new(MemoryStore::new()));

        let err = service
            .login(LoginRequest {
                username: "nobody".into(),
                password: "whatever".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), INVALID_CREDENTIALS);

        let hash = service.miss_hash.get().expect("miss hash computed");
        assert!(bcrypt::verify(MISS_PASSWORD, hash).unwrap());
    }

    #[tokio::test]
    async fn ambiguous_login_fails_like_a_miss() {
        let store = Arc::new(MemoryStore::new());
        let hash = bcrypt::hash("rahasia123", 4).unwrap();
        store.seed_user("budi", "budi@example.com", &hash, Role::User);
        store.seed_user("siti", "budi", &hash, Role::User);
        let service = service(store);

        let err = service
            .login(LoginRequest {
                username: "budi".into(),
                password: "rahasia123".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), INVALID_CREDENTIALS);
        assert!(service.miss_hash.initialized());
    }
}
