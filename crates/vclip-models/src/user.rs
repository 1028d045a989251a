//! User accounts. Registration, auth and session handling are external
//! collaborators; only the row shape referenced by videos/history lives here.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            email: normalize_email(&email.into()),
            created_at: Utc::now(),
        }
    }
}

/// Lowercase a raw email for the unique index.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_to_lowercase() {
        let u = User::new("  Person@Example.COM ");
        assert_eq!(u.email, "person@example.com");
    }
}
