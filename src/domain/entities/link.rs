//! Link entity representing a token-to-URL mapping with a fixed expiry.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A persisted short link.
///
/// `expires_at` is set once at creation and never changes. The public
/// short URL is not stored; see [`ShortLink`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    #[sqlx(rename = "original_link")]
    pub original_url: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Link {
    /// Creates a link that expires `ttl` after `now`.
    pub fn new(original_url: String, token: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            original_url,
            token,
            expires_at: now + ttl,
        }
    }

    /// Returns true if the link is eligible for deletion at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Builds the response view by appending the token to `prefix`.
    pub fn into_short_link(self, prefix: &str) -> ShortLink {
        ShortLink {
            short_link: format!("{}{}", prefix, self.token),
            token: self.token,
            original_url: self.original_url,
            expires_at: self.expires_at,
        }
    }
}

/// A link as returned to callers, with the derived short URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLink {
    pub token: String,
    pub original_url: String,
    pub expires_at: DateTime<Utc>,
    pub short_link: String,
}
