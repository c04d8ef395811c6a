//! User models.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// A registered user stored in the `users` collection.
///
/// Users are created at registration, which happens outside this backend; the
/// catalog only ever reads them. The `token` is an opaque session credential
/// compared by exact equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub token: String,
    pub created_at: DateTime,
}

/// The owner fields resolved onto an offer detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub username: String,
    pub email: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_summary_takes_username_and_email_only() {
        let user = User {
            id: ObjectId::new(),
            username: "camille".to_string(),
            email: "camille@example.com".to_string(),
            token: "secret-token".to_string(),
            created_at: DateTime::now(),
        };

        let summary = OwnerSummary::from(&user);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["username"], "camille");
        assert_eq!(json["email"], "camille@example.com");
        assert!(json.get("token").is_none());
    }
}
