//! crates/design_review_core/src/credentials.rs
//!
//! The credential store: user records and the persisted session identity,
//! both kept as JSON under fixed keys of a `KeyValueStore`.

use crate::domain::{User, UserRecord};
use crate::ports::{KeyValueStore, PortError, PortResult};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Key holding the serialized list of every registered user.
pub const USERS_KEY: &str = "system_design_users";
/// Key holding the sanitized identity of the signed-in user.
pub const CURRENT_USER_KEY: &str = "currentUser";

#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Returns every known user.
    ///
    /// Never fails: unreadable storage yields an empty list, and a value that
    /// does not parse is wiped so the next write starts clean.
    pub fn list_users(&self) -> Vec<UserRecord> {
        self.read_users().unwrap_or_else(|e| {
            warn!("Failed to read users from storage: {}", e);
            Vec::new()
        })
    }

    /// Like `list_users`, but a failed read is returned instead of being
    /// treated as an empty list. Absent or corrupt data is still `Ok(vec![])`.
    fn read_users(&self) -> PortResult<Vec<UserRecord>> {
        let Some(raw) = self.kv.get(USERS_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<UserRecord>>(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                warn!("Discarding corrupt user list in storage: {}", e);
                if let Err(e) = self.kv.remove(USERS_KEY) {
                    warn!("Failed to remove corrupt user list: {}", e);
                }
                Ok(Vec::new())
            }
        }
    }

    /// Case-insensitive lookup by email.
    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        Self::matching(self.list_users(), email)
    }

    /// Case-insensitive lookup that reports a failed read.
    pub fn lookup_email(&self, email: &str) -> PortResult<Option<UserRecord>> {
        Ok(Self::matching(self.read_users()?, email))
    }

    fn matching(users: Vec<UserRecord>, email: &str) -> Option<UserRecord> {
        let needle = email.to_lowercase();
        users.into_iter().find(|u| u.email.to_lowercase() == needle)
    }

    /// Appends a new user and rewrites the whole user list.
    ///
    /// Does not check for duplicates; callers look the email up first.
    /// A failed read aborts before anything is written.
    pub fn create(&self, name: &str, email: &str, password: &str) -> PortResult<UserRecord> {
        let record = UserRecord {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let mut users = self.read_users()?;
        users.push(record.clone());
        self.write_users(&users)?;
        Ok(record)
    }

    fn write_users(&self, users: &[UserRecord]) -> PortResult<()> {
        let json = serde_json::to_string(users)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.kv.set(USERS_KEY, &json)
    }

    //=====================================================================================
    // Session identity
    //=====================================================================================

    /// Persists the signed-in identity. Takes a `User`, so no password can reach storage.
    pub fn save_session_user(&self, user: &User) -> PortResult<()> {
        let json = serde_json::to_string(user)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.kv.set(CURRENT_USER_KEY, &json)
    }

    /// Loads the persisted identity, if any. A corrupt value is removed and
    /// treated as absent.
    pub fn load_session_user(&self) -> Option<User> {
        let raw = match self.kv.get(CURRENT_USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read session identity from storage: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding corrupt session identity: {}", e);
                if let Err(e) = self.kv.remove(CURRENT_USER_KEY) {
                    warn!("Failed to remove corrupt session identity: {}", e);
                }
                None
            }
        }
    }

    pub fn clear_session_user(&self) -> PortResult<()> {
        self.kv.remove(CURRENT_USER_KEY)
    }
}
