//! Cloudinary upload API client.
//!
//! This crate provides:
//! - Inline (base64 data URI) image upload
//! - SHA-256 request signing
//! - Best-effort image destruction for compensating cleanup

pub mod client;
pub mod error;

pub use client::{CloudinaryClient, CloudinaryConfig};
pub use error::{CloudinaryError, CloudinaryResult};
