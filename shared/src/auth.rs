//! Authentication state shared with the session layer
//!
//! Login itself lives outside the engine; the engine only reads who is
//! signed in so create requests can carry the waiter id.

use serde::{Deserialize, Serialize};

/// Waiter id used when nobody is signed in
pub const ANONYMOUS_WAITER: &str = "anonymous";

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Chef,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub name: String,
}

/// Persisted authentication state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

impl AuthState {
    /// Waiter id for order requests
    pub fn waiter_id(&self) -> &str {
        match (&self.user, self.is_authenticated) {
            (Some(user), true) => &user.id,
            _ => ANONYMOUS_WAITER,
        }
    }
}
