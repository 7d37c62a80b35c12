pub mod auth;
pub mod cache;
pub mod pagination;
pub mod rate_limit;
pub mod reconciler;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use rate_limit::{Delays, RateLimiter};
pub use reconciler::{Reconciled, Reconciler, SyncReport};

use thiserror::Error;

use crate::domain::{
    entities::{
        language::{ItemLanguage, Language},
        website::Website,
    },
    repositories::{
        auth::AuthError, catalog::CatalogError, resolver::ResolverError, source::SourceError,
    },
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("resolver error: {0}")]
    Resolver(#[from] ResolverError),
    #[error("audit error: {0}")]
    Audit(#[from] std::io::Error),
}

/// Fixed reference data and page sizes for a sync session.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Website the source items live on.
    pub website: Website,
    /// Languages that must exist in the catalog.
    pub languages: Vec<Language>,
    /// Item languages that must be registered for `website`.
    pub item_languages: Vec<ItemLanguage>,
    pub listing_page_size: u32,
    pub search_page_size: u32,
    pub feed_page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            website: Website {
                host: comicbagi_source::mangadex::WEBSITE_HOST.to_string(),
                name: "MangaDex".to_string(),
            },
            languages: default_languages(),
            item_languages: vec![ItemLanguage::new("en", 0), ItemLanguage::new("id", 0)],
            listing_page_size: 15,
            search_page_size: 10,
            feed_page_size: 50,
        }
    }
}

pub fn default_languages() -> Vec<Language> {
    [
        ("en", "English"),
        ("id", "Indonesian"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("zh", "Chinese"),
    ]
    .into_iter()
    .map(|(lang, name)| Language {
        lang: lang.to_string(),
        name: name.to_string(),
    })
    .collect()
}
