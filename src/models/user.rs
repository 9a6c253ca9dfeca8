//! User model, access token claims and the permission guard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::form::{self, FieldErrors};
use super::permission::Permission;
use crate::error::AppError;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create user request (superuser only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 150, message = "Ensure this value has between 1 and 150 characters."))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
    /// Permission codenames, e.g. `catalog.can_mark_returned`
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl CreateUser {
    /// Validates the fields and resolves the permission codenames
    pub fn validate_fields(&self) -> Result<Vec<Permission>, FieldErrors> {
        let mut errors = form::check(self);
        let mut permissions = Vec::with_capacity(self.permissions.len());
        for codename in &self.permissions {
            match codename.parse::<Permission>() {
                Ok(p) => permissions.push(p),
                Err(e) => errors.add("permissions", e),
            }
        }
        errors.ensure_empty()?;
        Ok(permissions)
    }
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub is_superuser: bool,
    /// Granted permission codenames
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Superusers hold every permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_superuser || self.permissions.iter().any(|p| p == permission)
    }

    /// Per-route guard: fails with `Authorization` (403) when the permission is missing
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(permission.as_str()) {
            Ok(())
        } else {
            tracing::debug!(user = %self.sub, %permission, "permission denied");
            Err(AppError::Authorization(format!(
                "Permission {} required",
                permission
            )))
        }
    }

    pub fn require_superuser(&self) -> Result<(), AppError> {
        if self.is_superuser {
            Ok(())
        } else {
            Err(AppError::Authorization("Superuser privileges required".to_string()))
        }
    }
}
