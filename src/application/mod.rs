//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and provide the only entry
//! point used by HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation and resolution
pub mod services;
