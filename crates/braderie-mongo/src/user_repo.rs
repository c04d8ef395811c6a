//! Typed repository for users.

use bson::doc;
use mongodb::Collection;

use braderie_models::User;

use crate::client::MongoHandle;
use crate::error::MongoResult;

const COLLECTION: &str = "users";

/// Repository for user documents. Read-only: registration happens outside
/// this backend.
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(handle: &MongoHandle) -> Self {
        Self {
            collection: handle.collection(COLLECTION),
        }
    }

    /// Look up the user holding the given session token.
    ///
    /// Exactly one lookup per credential check; tokens are compared by exact
    /// equality.
    pub async fn find_by_token(&self, token: &str) -> MongoResult<Option<User>> {
        let user = self.collection.find_one(doc! { "token": token }).await?;
        Ok(user)
    }

    /// Fetch a user by id, used to resolve an offer's owner reference.
    pub async fn find_by_id(&self, id: bson::oid::ObjectId) -> MongoResult<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(user)
    }
}
