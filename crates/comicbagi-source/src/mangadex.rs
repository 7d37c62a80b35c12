use std::fmt;

use anyhow::anyhow;
use serde::{
    Deserialize,
    de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor},
};

use crate::{Error, check_status, user_agent};

pub const WEBSITE_HOST: &str = "mangadex.org";
pub const DEFAULT_BASE_URL: &str = "https://api.mangadex.org";

/// Collection envelope returned by every MangaDex list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Cross reference keys of a manga in the order MangaDex sends them.
///
/// MangaDex encodes an empty map as `[]`, both shapes are accepted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Links(Vec<(String, String)>);

impl Links {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Links {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

struct LinksVisitor;

impl<'de> Visitor<'de> for LinksVisitor {
    type Value = Links;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of link keys to ids")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Links, A::Error> {
        let mut links = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            links.push((key, value));
        }
        Ok(Links(links))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Links, A::Error> {
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::custom("links array must be empty"));
        }
        Ok(Links::default())
    }
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LinksVisitor)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MangaAttributes {
    pub links: Option<Links>,
    pub available_translated_languages: Option<Vec<String>>,
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Manga {
    pub id: Option<String>,
    pub attributes: Option<MangaAttributes>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChapterAttributes {
    pub chapter: Option<String>,
    pub translated_language: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Chapter {
    pub id: Option<String>,
    pub attributes: Option<ChapterAttributes>,
}

#[derive(Debug, Clone)]
pub struct MangaDex {
    base_url: String,
    api_client: reqwest::Client,
}

impl MangaDex {
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

    pub async fn search_manga(&self, limit: u32, offset: u32) -> Result<Collection<Manga>, Error> {
        self.get_collection(format!("{}/manga", self.base_url), limit, offset)
            .await
    }

    pub async fn get_manga_feed(
        &self,
        manga_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Collection<Chapter>, Error> {
        self.get_collection(
            format!("{}/manga/{manga_id}/feed", self.base_url),
            limit,
            offset,
        )
        .await
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        url: String,
        limit: u32,
        offset: u32,
    ) -> Result<Collection<T>, Error> {
        debug!("GET {url} limit={limit} offset={offset}");

        let res = self
            .api_client
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await
            .map_err(|e| anyhow!("{e}"))?;

        Ok(check_status(res)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("{e}"))?)
    }
}
