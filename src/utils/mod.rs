//! Utility functions shared across layers.
//!
//! - [`token_generator`] - Random token generation
//! - [`url_validator`] - Absolute URI validation for incoming links

pub mod token_generator;
pub mod url_validator;
