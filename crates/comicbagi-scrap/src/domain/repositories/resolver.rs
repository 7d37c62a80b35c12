use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("companion error: {0}")]
    Companion(#[from] comicbagi_source::Error),
}

/// Companion that maps an external reference to a canonical comic code,
/// creating the comic on its side when needed.
#[async_trait]
pub trait ComicResolver: Send + Sync {
    async fn get_or_add_comic_complete(&self, mal_id: i64)
    -> Result<Option<String>, ResolverError>;
}
