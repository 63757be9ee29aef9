//! Explicit caller identity, passed to every store call.

use serde::{Deserialize, Serialize};

use crate::{PersistError, PersistResult};

/// Who is asking, and with what credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

impl Session {
    /// Session for a user without a bearer token (local backends).
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: None,
        }
    }

    /// Attach a bearer token for hosted backends.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// User id as given.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Bearer token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The user id, rejecting blank identities.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Unauthorized`] if the user id is blank.
    pub fn require_user(&self) -> PersistResult<&str> {
        let user = self.user_id.trim();
        if user.is_empty() {
            return Err(PersistError::Unauthorized("session has no user".into()));
        }
        Ok(user)
    }

    /// The bearer token, rejecting sessions without one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Unauthorized`] if no token is attached.
    pub fn require_token(&self) -> PersistResult<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| PersistError::Unauthorized("session has no access token".into()))
    }
}
