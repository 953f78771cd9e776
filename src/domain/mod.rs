//! Domain layer containing the link entity, the storage contract and the
//! expiration sweep.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Storage trait definitions
//! - [`expiration_sweeper`] - Periodic deletion of expired links
//!
//! # Expiration Flow
//!
//! 1. A repository backend spawns [`expiration_sweeper::run_expiration_sweeper`]
//! 2. Every tick, expired links are deleted via [`repositories::LinkRepository::delete_expired`]
//! 3. The deleted tokens are sent as one batch on the deletion channel
//! 4. The token cache listener removes them from the existence set

pub mod entities;
pub mod expiration_sweeper;
pub mod repositories;
