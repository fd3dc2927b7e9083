//! Authentication service - Handles user authentication and authorization.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User, UserState};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Token type (always "bearer")
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 10800)]
    pub expires_in: i64,
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
}

/// Input for [`AuthService::register`]
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub cellphone: Option<String>,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an enabled account
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Check credentials and issue a token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to an active, enabled user
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let lifetime = Duration::try_hours(config.jwt_expiration_hours)
        .filter(|lifetime| *lifetime > Duration::zero())
        .ok_or_else(|| AppError::internal("Invalid token lifetime"))?;
    let expires_at = now
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::internal("Invalid token lifetime"))?;

    let claims = Claims {
        sub: user.id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token encoding failed: {}", e)))?;

    Ok(TokenResponse {
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: lifetime.num_seconds(),
        access_token: token,
    })
}

fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::authentication("Token Expired"),
        _ => AppError::authentication("Could not validate credentials"),
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn ensure_unique(&self, registration: &Registration) -> AppResult<()> {
        let users = self.uow.users();

        if users
            .find_by_username_with_deleted(&registration.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Username"));
        }
        if let Some(email) = &registration.email {
            if users.find_by_email_with_deleted(email).await?.is_some() {
                return Err(AppError::conflict("Email"));
            }
        }
        if let Some(cellphone) = &registration.cellphone {
            if users.find_by_cellphone_with_deleted(cellphone).await?.is_some() {
                return Err(AppError::conflict("Cellphone"));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        self.ensure_unique(&registration).await?;

        let password_hash = Password::new(&registration.password)?.into_string();
        let nickname = registration
            .nickname
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| registration.username.clone());

        let user = self
            .uow
            .users()
            .create(NewUser {
                username: registration.username,
                nickname,
                password_hash,
                email: registration.email,
                cellphone: registration.cellphone,
                state: UserState::Enabled,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let user = match self.uow.users().find_by_username(&username).await? {
            Some(user) => user,
            None => {
                Password::verify_dummy(&password);
                return Err(AppError::authentication("Incorrect username or password"));
            }
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            return Err(AppError::authentication("Incorrect username or password"));
        }

        if !user.is_enabled() {
            return Err(AppError::authentication("User is disabled"));
        }

        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::authentication("User not found"))?;

        if !user.is_enabled() {
            return Err(AppError::authentication("Inactive user"));
        }

        Ok(user)
    }
}
