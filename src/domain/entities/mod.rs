//! Core domain entities.
//!
//! - [`Link`] - A persisted token-to-URL mapping with an expiry
//! - [`ShortLink`] - The response view of a link, including the derived short URL

pub mod link;

pub use link::{Link, ShortLink};
