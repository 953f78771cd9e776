//! Link repository implementations.
//!
//! Both backends implement [`crate::domain::repositories::LinkRepository`]
//! and embed their own expiration sweeper.
//!
//! # Repositories
//!
//! - [`InMemoryLinkRepository`] - Volatile map, lost on restart
//! - [`PgLinkRepository`] - PostgreSQL table with runtime-checked queries

pub mod memory_link_repository;
pub mod pg_link_repository;
pub mod postgres;
mod sweeper_slot;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
pub use postgres::{PoolSettings, connect_with_retry, run_migrations};
