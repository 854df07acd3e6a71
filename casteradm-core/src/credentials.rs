use crate::storage::SessionStorage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const USER_KEY: &str = "user";
pub const PASSWORD_KEY: &str = "password";

/// The (user, password) pair replayed on every admin API call
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
        }
    }

    /// Request parameters in wire order. Absent values go out as empty strings.
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        vec![
            (USER_KEY.to_string(), self.user.clone().unwrap_or_default()),
            (PASSWORD_KEY.to_string(), self.password.clone().unwrap_or_default()),
        ]
    }
}

// Keep the password out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Credential access on top of an injected session storage
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn SessionStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Credentials {
        Credentials {
            user: self.storage.get_item(USER_KEY),
            password: self.storage.get_item(PASSWORD_KEY),
        }
    }

    /// Overwrites whatever was stored before. No validation: empty strings are kept.
    pub fn set(&self, user: &str, password: &str) {
        self.storage.set_item(USER_KEY, user);
        self.storage.set_item(PASSWORD_KEY, password);
    }

    pub fn clear(&self) {
        self.storage.remove_item(USER_KEY);
        self.storage.remove_item(PASSWORD_KEY);
    }

    pub fn is_logged_in(&self) -> bool {
        self.storage
            .get_item(USER_KEY)
            .is_some_and(|user| !user.is_empty())
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("alice", "secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("alice"));
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_form_pairs_absent_values() {
        let pairs = Credentials::default().form_pairs();
        assert_eq!(
            pairs,
            vec![
                ("user".to_string(), String::new()),
                ("password".to_string(), String::new()),
            ]
        );
    }
}
