//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, User, UserClaims},
    repository::{users::NewUser, Repository},
};

const INVALID_CREDENTIALS: &str = "Please enter a correct username and password.";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user and return a JWT token with the claims it carries
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, UserClaims)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !user.is_active || !verify_password(&user, password)? {
            tracing::info!(%username, "login rejected");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let issued = self.create_token_for_user(&user).await?;
        tracing::info!(user_id = user.id, "user logged in");
        Ok(issued)
    }

    async fn create_token_for_user(&self, user: &User) -> AppResult<(String, UserClaims)> {
        let permissions = self.repository.users.get_permissions(user.id).await?;

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_superuser: user.is_superuser,
            permissions,
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;
        Ok((token, claims))
    }

    /// Create a user with hashed password and permission grants
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        let permissions = request.validate_fields().map_err(AppError::Form)?;
        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(&NewUser {
                username: &request.username,
                password_hash: &password_hash,
                first_name: &request.first_name,
                last_name: &request.last_name,
                email: request.email.as_deref().unwrap_or_default(),
                is_superuser: request.is_superuser,
                permissions: &permissions,
            })
            .await?;
        tracing::info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
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

        let password_hash = hash_password(password)?;
        let user = self
            .repository
            .users
            .create(&NewUser {
                username,
                password_hash: &password_hash,
                first_name: "",
                last_name: "",
                email: "",
                is_superuser: true,
                permissions: &[],
            })
            .await?;
        tracing::info!(username = %user.username, "bootstrap superuser created");
        Ok(Some(user))
    }
}

fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
