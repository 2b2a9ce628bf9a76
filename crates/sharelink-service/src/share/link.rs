//! Share link token generation and URL building.

use sharelink_auth::generate_share_token;
use sharelink_entity::share::{Share, ShareView};

/// Generates share tokens and renders shares with their public URL.
#[derive(Debug, Clone)]
pub struct LinkService {
    /// Externally reachable base URL.
    base_url: String,
    /// Path segment between the base URL and the token.
    link_prefix: String,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(base_url: impl Into<String>, link_prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            link_prefix: link_prefix.into(),
        }
    }

    /// Generates a cryptographically secure random token for share links.
    pub fn generate_token(&self) -> String {
        generate_share_token()
    }

    /// Renders a share for its owner.
    pub fn view(&self, share: &Share) -> ShareView {
        ShareView::new(share, &self.base_url, &self.link_prefix)
    }
}
