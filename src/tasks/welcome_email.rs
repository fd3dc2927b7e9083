use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Greets a freshly registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeEmail {
    pub to: String,
    pub username: String,
}

impl WelcomeEmail {
    pub const NAME: &'static str = "welcome_email";

    pub fn new(to: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            username: username.into(),
        }
    }

    fn subject(&self) -> String {
        format!("Welcome, {}", self.username)
    }
}

/// No mail transport is wired in, so the message is logged.
pub async fn welcome_email(task: WelcomeEmail) -> AppResult<()> {
    if !task.to.contains('@') {
        return Err(AppError::Validation(format!(
            "Invalid recipient address: {}",
            task.to
        )));
    }

    tracing::info!(
        task = WelcomeEmail::NAME,
        to = %task.to,
        subject = %task.subject(),
        "Welcome email processed"
    );
    Ok(())
}
