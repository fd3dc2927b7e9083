//! Current-user profile handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Gender, ProfileChanges, UserDetail};
use crate::errors::AppResult;

/// Profile update request; omitted fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "Nickname must be 1 to 50 characters"))]
    #[schema(example = "Ally")]
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    #[validate(length(max = 255, message = "Avatar must be at most 255 characters"))]
    #[schema(example = "https://example.com/avatar.png")]
    pub avatar: Option<String>,
}

/// Routes under `/api/user` (authenticated)
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user).put(update_current_user))
}

/// Get current user profile
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserDetail),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserDetail>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(UserDetail::from(user)))
}

/// Update current user profile
#[utoipa::path(
    put,
    path = "/api/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserDetail),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserDetail>> {
    let changes = ProfileChanges {
        nickname: payload.nickname,
        gender: payload.gender,
        avatar: payload.avatar,
    };

    let user = state
        .user_service
        .update_profile(current_user.id, changes)
        .await?;

    Ok(Json(UserDetail::from(user)))
}
