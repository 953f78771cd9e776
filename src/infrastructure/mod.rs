//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete storage backends and the token existence cache.
//!
//! # Modules
//!
//! - [`cache`] - Token existence cache fed by the expiration sweeper
//! - [`persistence`] - In-memory and PostgreSQL link repositories

pub mod cache;
pub mod persistence;
