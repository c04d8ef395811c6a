//! MongoDB client handle.

use bson::doc;
use mongodb::{Client, Collection, Database};
use tracing::info;

use crate::error::{MongoError, MongoResult};

/// Configuration for the MongoDB connection.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    pub uri: String,
    /// Database name.
    pub database: String,
}

impl MongoConfig {
    /// Create config from environment variables.
    pub fn from_env() -> MongoResult<Self> {
        Ok(Self {
            uri: std::env::var("DATABASE_URL")
                .map_err(|_| MongoError::config("DATABASE_URL not set"))?,
            database: std::env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "braderie".to_string()),
        })
    }
}

/// Handle to the MongoDB database.
///
/// Constructed once at process start and passed into each repository; the
/// driver connects lazily on first use and the pool is shared via cloning.
#[derive(Clone)]
pub struct MongoHandle {
    db: Database,
}

impl MongoHandle {
    /// Create a new handle from configuration.
    pub async fn new(config: MongoConfig) -> MongoResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);
        info!(database = %config.database, "MongoDB handle created");
        Ok(Self { db })
    }

    /// Create from environment variables.
    pub async fn from_env() -> MongoResult<Self> {
        let config = MongoConfig::from_env()?;
        Self::new(config).await
    }

    /// Get a typed collection.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Check connectivity with a ping command.
    pub async fn check_connectivity(&self) -> MongoResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
