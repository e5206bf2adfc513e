//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    access::Permission,
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, LoginResponse, User, UserClaims, UserInfo},
    repository::{users::NewUser, Repository},
};

/// Permission codenames that can be granted to an account
const GRANTABLE: [Permission; 2] = [Permission::CanMarkReturned, Permission::CanChange];

/// Hash a password with argon2 and a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by username and return a bearer token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user.password_hash, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }
        if !user.is_active {
            return Err(AppError::Authentication("This account is inactive".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.username);

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_hours as i64 * 3600,
            user: UserInfo::from(&user),
        })
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_superuser: user.is_superuser,
            permissions: user.permissions.clone(),
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create a user account
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(unknown) = user
            .permissions
            .iter()
            .find(|p| !GRANTABLE.iter().any(|g| g.codename() == p.as_str()))
        {
            return Err(AppError::invalid_field(
                "permissions",
                &format!("Unknown permission: {}", unknown),
            ));
        }

        let password_hash = hash_password(&user.password)?;
        let created = self
            .repository
            .users
            .create(&NewUser {
                username: user.username.trim(),
                password_hash: &password_hash,
                first_name: &user.first_name,
                last_name: &user.last_name,
                email: user.email.as_deref().unwrap_or_default(),
                is_superuser: user.is_superuser,
                permissions: &user.permissions,
            })
            .await?;

        tracing::info!("Created user {} ({})", created.id, created.username);
        Ok(created)
    }

    /// Create the configured superuser when no account exists yet
    pub async fn ensure_admin(&self) -> AppResult<Option<User>> {
        let (Some(username), Some(password)) =
            (&self.config.admin_username, &self.config.admin_password)
        else {
            return Ok(None);
        };

        if self.repository.users.count().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .create_user(CreateUser {
                username: username.clone(),
                password: password.clone(),
                first_name: String::new(),
                last_name: String::new(),
                email: None,
                is_superuser: true,
                permissions: Vec::new(),
            })
            .await?;
        tracing::warn!("Created bootstrap superuser {}", admin.username);
        Ok(Some(admin))
    }
}
