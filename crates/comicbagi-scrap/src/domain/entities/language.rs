use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub lang: String,
    pub name: String,
}

/// Availability of a language on a website or a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLanguage {
    pub language_lang: String,
    #[serde(default)]
    pub machine_translate: i32,
}

impl ItemLanguage {
    pub fn new(language_lang: &str, machine_translate: i32) -> Self {
        Self {
            language_lang: language_lang.to_string(),
            machine_translate,
        }
    }
}
