//! Application Configuration

use std::fmt;

use platform::password::PasswordHasher;

use crate::domain::value_object::paging::PageRequest;

#[derive(Clone)]
pub struct MarketplaceConfig {
    /// Application-wide secret appended to passwords before hashing
    pub password_pepper: Option<Vec<u8>>,
    /// Page size when a search does not ask for one
    pub default_page_size: u32,
    /// Upper bound for any requested page size
    pub max_page_size: u32,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            password_pepper: None,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl MarketplaceConfig {
    /// Defaults plus a fixed, publicly known pepper. Never use in production.
    pub fn development() -> Self {
        Self {
            password_pepper: Some(b"marketplace-development-pepper".to_vec()),
            ..Self::default()
        }
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.password_pepper.clone())
    }

    pub fn page_request(&self, page: Option<u32>, size: Option<u32>) -> PageRequest {
        PageRequest::new(page, size, self.default_page_size, self.max_page_size)
    }
}

impl fmt::Debug for MarketplaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketplaceConfig")
            .field("password_pepper", &self.pepper().map(|_| "[REDACTED]"))
            .field("default_page_size", &self.default_page_size)
            .field("max_page_size", &self.max_page_size)
            .finish()
    }
}
