use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::link::Link;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub code: String,
}

/// Cross reference from a comic or a chapter to an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationLink {
    pub link_website_host: String,
    #[serde(default)]
    pub link_relative_reference: Option<String>,
    #[serde(default)]
    pub released_at: Option<DateTime<Utc>>,
}

impl DestinationLink {
    pub fn new(link: &Link, released_at: DateTime<Utc>) -> Self {
        Self {
            link_website_host: link.website_host.clone(),
            link_relative_reference: link.relative_reference.clone(),
            released_at: Some(released_at),
        }
    }

    pub fn href(&self) -> String {
        format!(
            "{}{}",
            self.link_website_host,
            self.link_relative_reference.as_deref().unwrap_or_default()
        )
    }
}
