use anyhow::anyhow;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{Error, check_status, user_agent};

#[derive(Debug, Clone, Deserialize)]
struct ComicCode {
    code: String,
}

/// Companion catalog that owns MyAnimeList-backed comic records.
#[derive(Debug, Clone)]
pub struct ComicKing {
    base_url: String,
    api_client: reqwest::Client,
}

impl ComicKing {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let api_client = reqwest::Client::builder()
            .user_agent(user_agent())
            .build()
            .map_err(|e| anyhow!("{e}"))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_client,
        })
    }

    /// Looks up the comic for a MyAnimeList manga, importing it first when the
    /// companion has not seen it yet. `None` when MyAnimeList has no such manga.
    pub async fn get_or_add_comic_complete(&self, mal_id: i64) -> Result<Option<String>, Error> {
        let url = format!("{}/comics/myanimelist/{mal_id}", self.base_url);
        debug!("POST {url}");

        let res = self
            .api_client
            .post(&url)
            .send()
            .await
            .map_err(|e| anyhow!("{e}"))?;

        read_comic_code(res).await
    }
}

async fn read_comic_code(res: reqwest::Response) -> Result<Option<String>, Error> {
    if res.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let comic: ComicCode = check_status(res)
        .await?
        .json()
        .await
        .map_err(|e| anyhow!("{e}"))?;

    Ok(Some(comic.code))
}
