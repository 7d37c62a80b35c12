use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid chapter number: {0:?}")]
pub struct ParseChapterNumberError(pub String);

/// Chapter number as the catalog stores it: an integer when the source wrote
/// one, a float otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChapterNumber {
    Whole(i64),
    Fractional(f64),
}

impl FromStr for ChapterNumber {
    type Err = ParseChapterNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<i64>() {
            return Ok(ChapterNumber::Whole(number));
        }

        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(ChapterNumber::Fractional(number)),
            _ => Err(ParseChapterNumberError(s.to_string())),
        }
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChapterNumber::Whole(number) => write!(f, "{number}"),
            // keep the trailing ".0" so keys match the ones already stored
            ChapterNumber::Fractional(number) if number.fract() == 0.0 => {
                write!(f, "{number:.1}")
            }
            ChapterNumber::Fractional(number) => write!(f, "{number}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComicChapter {
    pub number: ChapterNumber,
    #[serde(default)]
    pub version: Option<String>,
}

impl ComicChapter {
    pub fn new(number: ChapterNumber) -> Self {
        Self {
            number,
            version: None,
        }
    }

    /// Path segment addressing this chapter under its comic. The version is
    /// not part of it.
    pub fn nv(&self) -> String {
        self.number.to_string()
    }
}

/// Identity of a chapter across the session, `"<comic code> <number>"`.
pub fn chapter_key(comic_code: &str, number: &ChapterNumber) -> String {
    format!("{comic_code} {number}")
}
