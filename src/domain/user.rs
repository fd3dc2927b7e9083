//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{STATE_DISABLED, STATE_ENABLED};

/// Account state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    Enabled,
    Disabled,
}

impl UserState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, UserState::Enabled)
    }
}

/// Only the exact `enabled` value enables an account.
impl From<&str> for UserState {
    fn from(s: &str) -> Self {
        match s {
            STATE_ENABLED => UserState::Enabled,
            _ => UserState::Disabled,
        }
    }
}

impl std::fmt::Display for UserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserState::Enabled => write!(f, "{}", STATE_ENABLED),
            UserState::Disabled => write!(f, "{}", STATE_DISABLED),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Gender::Unknown => "unknown",
            Gender::Male => "male",
            Gender::Female => "female",
        };
        f.write_str(s)
    }
}

/// User domain entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub gender: Gender,
    pub avatar: String,
    pub cellphone: Option<String>,
    pub email: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub password_hash: String,
    pub state: UserState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// None = active, Some = soft deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data needed to insert a user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub nickname: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub cellphone: Option<String>,
    pub state: UserState,
}

/// Profile fields a user may change; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub nickname: Option<String>,
    pub gender: Option<Gender>,
    pub avatar: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.gender.is_none() && self.avatar.is_none()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDetail {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "Admin")]
    pub nickname: String,
    pub gender: Gender,
    pub avatar: String,
    pub cellphone: Option<String>,
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub state: UserState,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDetail {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            nickname: user.nickname,
            gender: user.gender,
            avatar: user.avatar,
            cellphone: user.cellphone,
            email: user.email,
            email_verified_at: user.email_verified_at,
            state: user.state,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip_strings() {
        assert_eq!(UserState::from("enabled"), UserState::Enabled);
        assert_eq!(UserState::from("disabled"), UserState::Disabled);
        assert_eq!(UserState::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_unknown_state_is_not_enabled() {
        for raw in ["locked", "banned", "Enabled", " enabled", ""] {
            let state = UserState::from(raw);
            assert_eq!(state, UserState::Disabled, "{:?}", raw);
            assert!(!state.is_enabled());
        }
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!(Gender::from("female"), Gender::Female);
        assert_eq!(Gender::from(""), Gender::Unknown);
        assert_eq!(Gender::Male.to_string(), "male");
    }

    #[test]
    fn test_detail_serializes_lowercase_enums() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            nickname: "Alice".into(),
            gender: Gender::Female,
            avatar: String::new(),
            cellphone: None,
            email: Some("alice@example.com".into()),
            email_verified_at: None,
            password_hash: "hash".into(),
            state: UserState::Enabled,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(UserDetail::from(user)).unwrap();
        assert_eq!(json["gender"], "female");
        assert_eq!(json["state"], "enabled");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_profile_changes_is_empty() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            avatar: Some("https://example.com/a.png".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
