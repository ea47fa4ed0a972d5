use chrono::{DateTime, Utc};

use crate::ids::UserId;

/// Registered catalog user.
///
/// Users are never hard deleted; deactivation hides them from default
/// listings while keeping their likes and reviews intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Unique, stored lowercase.
    pub username: String,
    /// Unique, stored lowercase.
    pub email: String,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}
