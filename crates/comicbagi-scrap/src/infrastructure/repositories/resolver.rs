use async_trait::async_trait;
use comicbagi_source::ComicKing;

use crate::domain::repositories::resolver::{ComicResolver, ResolverError};

pub struct ComicResolverImpl {
    client: ComicKing,
}

impl ComicResolverImpl {
    pub fn new(client: ComicKing) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ComicResolver for ComicResolverImpl {
    async fn get_or_add_comic_complete(
        &self,
        mal_id: i64,
    ) -> Result<Option<String>, ResolverError> {
        Ok(self.client.get_or_add_comic_complete(mal_id).await?)
    }
}
