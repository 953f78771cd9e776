//! Token existence cache used to short-circuit collision checks.
//!
//! Provides a [`TokenCache`] trait with one implementation:
//! - [`MemoryTokenCache`] - Process-local set kept in sync by the deletion feed

mod memory_token_cache;
mod service;

pub use memory_token_cache::MemoryTokenCache;
pub use service::{CacheError, CacheResult, TokenCache};

#[cfg(test)]
pub use service::MockTokenCache;
