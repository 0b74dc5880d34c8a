//! # quill-core
//!
//! Core crate for the Quill blogging platform. Contains configuration
//! schemas, pagination types, the cache provider trait, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Quill crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
