//! Auth provider contract.
//!
//! The request lifecycle only ever needs the current user's id to tag
//! create/list calls, so the seam is a single lookup. Login and
//! registration flows live outside this crate.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::request::UserId;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Helper,
    Admin,
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Supplies the currently signed-in user, if any.
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Auth provider holding an explicit session, for wiring and tests.
#[derive(Default)]
pub struct StaticAuthProvider {
    user: Mutex<Option<User>>,
}

impl StaticAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: Mutex::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: User) {
        *self.user.lock() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.lock() = None;
    }
}

impl AuthProvider for StaticAuthProvider {
    fn current_user(&self) -> Option<User> {
        self.user.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_tracks_session() {
        let provider = StaticAuthProvider::new();
        assert!(provider.current_user().is_none());

        provider.sign_in(User {
            id: UserId::from("1"),
            email: "parent@example.com".to_string(),
            name: "Parent User".to_string(),
            role: Role::Parent,
        });
        assert_eq!(provider.current_user().unwrap().id, UserId::from("1"));

        provider.sign_out();
        assert!(provider.current_user().is_none());
    }
}
