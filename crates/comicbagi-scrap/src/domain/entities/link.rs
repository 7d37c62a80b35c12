use serde::{Deserialize, Serialize};

/// An external URL, split into the website it lives on and the path below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub website_host: String,
    #[serde(default)]
    pub relative_reference: Option<String>,
}

impl Link {
    pub fn new(website_host: &str, relative_reference: &str) -> Self {
        Self {
            website_host: website_host.to_string(),
            relative_reference: Some(relative_reference.to_string()),
        }
    }

    pub fn href(&self) -> String {
        format!(
            "{}{}",
            self.website_host,
            self.relative_reference.as_deref().unwrap_or_default()
        )
    }
}
