use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered user of the service.
/// Root entity for the friendship graph and the source of likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal immutable identifier, assigned by the store on creation
    pub id: i64,

    /// Display name; defaults to the login when blank at creation
    pub name: String,

    /// Contact email, must contain '@'
    pub email: String,

    /// Unique-looking handle, no whitespace allowed
    pub login: String,

    /// Date of birth, never in the future
    pub birthday: NaiveDate,

    /// Ids of befriended users. Friendship is symmetric: if this set
    /// contains `b`, then user `b`'s set contains this user's id.
    #[serde(default)]
    pub friends: BTreeSet<i64>,
}

impl User {
    /// Build an unsaved user record. The store assigns the real id.
    pub fn new(name: String, email: String, login: String, birthday: NaiveDate) -> Self {
        Self {
            id: 0,
            name,
            email,
            login,
            birthday,
            friends: BTreeSet::new(),
        }
    }
}
