//! MongoDB access layer for the Braderie backend.
//!
//! This crate provides:
//! - An explicitly constructed client handle (no ambient globals)
//! - Typed repositories for users and offers
//! - Filter, sort, and pagination planning for offer queries

pub mod client;
pub mod error;
pub mod offer_repo;
pub mod query;
pub mod user_repo;

pub use client::{MongoConfig, MongoHandle};
pub use error::{MongoError, MongoResult};
pub use offer_repo::OfferRepository;
pub use query::{OfferFilter, PagePlan, SortOrder};
pub use user_repo::UserRepository;
