//! Application state.

use std::sync::Arc;

use braderie_cloudinary::CloudinaryClient;
use braderie_mongo::{MongoHandle, OfferRepository, UserRepository};

use crate::config::ApiConfig;

/// Shared application state.
///
/// All external collaborators are constructed once at process start and
/// passed in explicitly; handlers never reach for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub mongo: MongoHandle,
    pub users: UserRepository,
    pub offers: OfferRepository,
    pub cloudinary: Arc<CloudinaryClient>,
}

impl AppState {
    /// Assemble state from already constructed collaborators.
    pub fn new(config: ApiConfig, mongo: MongoHandle, cloudinary: CloudinaryClient) -> Self {
        let users = UserRepository::new(&mongo);
        let offers = OfferRepository::new(&mongo);
        Self {
            config,
            mongo,
            users,
            offers,
            cloudinary: Arc::new(cloudinary),
        }
    }

    /// Create state from environment variables.
    pub async fn from_env(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mongo = MongoHandle::from_env().await?;
        let cloudinary = CloudinaryClient::from_env()?;
        Ok(Self::new(config, mongo, cloudinary))
    }
}
