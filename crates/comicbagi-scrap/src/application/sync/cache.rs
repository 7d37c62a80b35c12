use std::collections::HashSet;

/// What the session already knows to exist in the catalog.
///
/// Entries are only ever added. Item languages belong to the one website the
/// session syncs from.
#[derive(Debug, Default, Clone)]
pub struct IdentityCache {
    languages: HashSet<String>,
    websites: HashSet<String>,
    item_languages: HashSet<String>,
    chapters: HashSet<String>,
}

impl IdentityCache {
    pub fn has_language(&self, lang: &str) -> bool {
        self.languages.contains(lang)
    }

    pub fn insert_language(&mut self, lang: impl Into<String>) {
        self.languages.insert(lang.into());
    }

    pub fn has_website(&self, host: &str) -> bool {
        self.websites.contains(host)
    }

    pub fn insert_website(&mut self, host: impl Into<String>) {
        self.websites.insert(host.into());
    }

    pub fn has_item_language(&self, lang: &str) -> bool {
        self.item_languages.contains(lang)
    }

    pub fn insert_item_language(&mut self, lang: impl Into<String>) {
        self.item_languages.insert(lang.into());
    }

    pub fn has_chapter(&self, key: &str) -> bool {
        self.chapters.contains(key)
    }

    pub fn insert_chapter(&mut self, key: impl Into<String>) {
        self.chapters.insert(key.into());
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    pub fn item_language_count(&self) -> usize {
        self.item_languages.len()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}
