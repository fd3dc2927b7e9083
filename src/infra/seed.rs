//! Default data seeding.

use crate::config::Config;
use crate::domain::{NewUser, Password, UserState};
use crate::errors::AppResult;

use super::unit_of_work::UnitOfWork;

/// Outcome of [`ensure_default_admin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

/// Create the configured admin account unless its username or email is
/// taken.
///
/// Soft-deleted rows count as taken, so running the seed twice is a no-op.
pub async fn ensure_default_admin(uow: &dyn UnitOfWork, config: &Config) -> AppResult<SeedOutcome> {
    let users = uow.users();

    if users
        .find_by_username_with_deleted(&config.admin_username)
        .await?
        .is_some()
    {
        tracing::info!(username = %config.admin_username, "Default admin already present");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    if users
        .find_by_email_with_deleted(&config.admin_email)
        .await?
        .is_some()
    {
        tracing::warn!(
            email = %config.admin_email,
            "Default admin email already in use, skipping seed"
        );
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let password = Password::new(config.admin_password())?;
    let admin = users
        .create(NewUser {
            username: config.admin_username.clone(),
            nickname: config.admin_username.clone(),
            password_hash: password.into_string(),
            email: Some(config.admin_email.clone()),
            cellphone: None,
            state: UserState::Enabled,
        })
        .await?;

    tracing::info!(user_id = %admin.id, username = %admin.username, "Default admin created");
    Ok(SeedOutcome::Created)
}
