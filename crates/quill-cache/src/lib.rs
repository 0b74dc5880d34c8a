//! # quill-cache
//!
//! Cache layer for Quill. Provides a [`provider::CacheManager`] that
//! dispatches to Redis or an in-memory store based on configuration,
//! and centralized key construction in [`keys`].

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
