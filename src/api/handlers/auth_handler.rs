//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserDetail;
use crate::errors::AppResult;
use crate::services::{Registration, TokenResponse};
use crate::types::Created;

/// Digits with an optional leading `+`, 6 to 20 long
pub(crate) static CELLPHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{6,20}$").expect("cellphone regex is valid"));

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3 to 20 characters"))]
    #[schema(example = "admin", min_length = 3, max_length = 20)]
    pub username: String,
    #[validate(length(min = 6, max = 50, message = "Password must be 6 to 50 characters"))]
    #[schema(example = "123456", min_length = 6, max_length = 50)]
    pub password: String,
}

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3 to 20 characters"))]
    #[schema(example = "alice", min_length = 3, max_length = 20)]
    pub username: String,
    #[validate(length(min = 6, max = 50, message = "Password must be 6 to 50 characters"))]
    #[schema(example = "s3cret!", min_length = 6, max_length = 50)]
    pub password: String,
    /// Defaults to the username
    #[validate(length(max = 50, message = "Nickname must be at most 50 characters"))]
    #[schema(example = "Alice")]
    pub nickname: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[validate(regex(path = *CELLPHONE_RE, message = "Invalid cellphone number"))]
    #[schema(example = "+8613800000000")]
    pub cellphone: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect username or password, or user disabled"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserDetail),
        (status = 409, description = "Username, email or cellphone already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserDetail>> {
    let user = state
        .auth_service
        .register(Registration {
            username: payload.username,
            password: payload.password,
            nickname: payload.nickname,
            email: payload.email,
            cellphone: payload.cellphone,
        })
        .await?;

    Ok(Created(UserDetail::from(user)))
}
