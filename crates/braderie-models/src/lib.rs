//! Shared data models for the Braderie backend.
//!
//! This crate provides Serde-serializable types for:
//! - Offers (product listings) and their fixed attribute details
//! - Image descriptors returned by the hosting provider
//! - Users and the owner summary exposed on offer detail

pub mod offer;
pub mod user;

// Re-export common types
pub use offer::{ImageDescriptor, Offer, OfferSummary, ProductDetail};
pub use user::{OwnerSummary, User};
