use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::{
    application::sync::{Delays, SyncSettings, default_languages},
    domain::entities::{
        language::{ItemLanguage, Language},
        website::Website,
    },
};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OAuthConfig {
    /// Issuer root, `authorize` and `oauth/token` are resolved below it.
    pub issuer: String,
    pub client_id: String,
    pub client_secret: String,
    pub audience: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MangaDexConfig {
    #[serde(default = "default_mangadex_base_url")]
    pub base_url: String,
}

impl Default for MangaDexConfig {
    fn default() -> Self {
        Self {
            base_url: default_mangadex_base_url(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ComicKingConfig {
    pub base_url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SeedItemLanguage {
    pub lang: String,
    #[serde(default)]
    pub machine_translate: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SeedConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,
    #[serde(default = "default_website")]
    pub website: Website,
    #[serde(default = "default_item_languages")]
    pub item_languages: Vec<SeedItemLanguage>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            website: default_website(),
            item_languages: default_item_languages(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PageSizeConfig {
    #[serde(default = "default_listing_page_size")]
    pub listing: u32,
    #[serde(default = "default_search_page_size")]
    pub search: u32,
    #[serde(default = "default_feed_page_size")]
    pub feed: u32,
}

impl Default for PageSizeConfig {
    fn default() -> Self {
        Self {
            listing: default_listing_page_size(),
            search: default_search_page_size(),
            feed: default_feed_page_size(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
    #[serde(default)]
    pub mangadex: MangaDexConfig,
    #[serde(default)]
    pub comicking: Option<ComicKingConfig>,
    #[serde(default)]
    pub note_path: Option<String>,
    #[serde(default)]
    pub delays: Delays,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub page_size: PageSizeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: comicbagi_home().join("config.yml"),
            base_url: default_base_url(),
            oauth: None,
            mangadex: MangaDexConfig::default(),
            comicking: None,
            note_path: None,
            delays: Delays::default(),
            seed: SeedConfig::default(),
            page_size: PageSizeConfig::default(),
        }
    }
}

fn comicbagi_home() -> PathBuf {
    match std::env::var("COMICBAGI_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".comicbagi"),
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_mangadex_base_url() -> String {
    comicbagi_source::mangadex::DEFAULT_BASE_URL.to_string()
}

fn default_website() -> Website {
    SyncSettings::default().website
}

fn default_item_languages() -> Vec<SeedItemLanguage> {
    ["en", "id"]
        .into_iter()
        .map(|lang| SeedItemLanguage {
            lang: lang.to_string(),
            machine_translate: 0,
        })
        .collect()
}

fn default_listing_page_size() -> u32 {
    15
}

fn default_search_page_size() -> u32 {
    10
}

fn default_feed_page_size() -> u32 {
    50
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => comicbagi_home().join("config.yml"),
        };

        match std::fs::File::open(&config_path) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                Ok(cfg)
            }
            Err(e) => Err(anyhow!("cannot open config {:?}: {e}", config_path)),
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// OAuth settings, which every catalog write needs.
    pub fn oauth(&self) -> Result<&OAuthConfig, anyhow::Error> {
        self.oauth
            .as_ref()
            .ok_or_else(|| anyhow!("oauth is not configured in {:?}", self.path))
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            website: self.seed.website.clone(),
            languages: self.seed.languages.clone(),
            item_languages: self
                .seed
                .item_languages
                .iter()
                .map(|item| ItemLanguage::new(&item.lang, item.machine_translate))
                .collect(),
            listing_page_size: self.page_size.listing,
            search_page_size: self.page_size.search,
            feed_page_size: self.page_size.feed,
        }
    }
}
