//! Identity records exchanged with the user service.

use serde::{Deserialize, Serialize};

use super::{Provider, UserId};

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub provider: Provider,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

/// Result of a successful sign-up or sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token; empty when the user service issued none.
    pub access_token: String,
    /// Token lifetime in seconds.
    pub access_expired: u64,
    pub user: UserProfile,
}

impl Session {
    /// Whether the session carries a token worth handing to the browser.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

/// Native sign-up request body.
///
/// Implements `Debug` manually to keep the password out of logs.
#[derive(Clone, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(7),
            provider: Provider::Native,
            name: "Tester".to_owned(),
            email: "test@example.com".to_owned(),
            picture: None,
        }
    }

    #[test]
    fn test_has_token() {
        let mut session = Session {
            access_token: "abc".to_owned(),
            access_expired: 3600,
            user: profile(),
        };
        assert!(session.has_token());

        session.access_token.clear();
        assert!(!session.has_token());
    }

    #[test]
    fn test_signup_form_debug_redacts_password() {
        let form = SignupForm {
            name: "Tester".to_owned(),
            email: "test@example.com".to_owned(),
            password: "hunter2-secret".to_owned(),
        };
        let debug = format!("{form:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2-secret"));
    }
}
