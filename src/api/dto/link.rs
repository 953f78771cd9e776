//! DTOs for link creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The original URL; must be an absolute URI.
    #[validate(length(min = 1, message = "Link must not be empty"))]
    pub link: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateLinkResponse {
    pub short_link: String,
    pub expires_at: DateTime<Utc>,
}

impl From<ShortLink> for CreateLinkResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            short_link: link.short_link,
            expires_at: link.expires_at,
        }
    }
}
