use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Forum category. Stored as its numeric code, presented as its slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PcGames,
    ConsoleGames,
    MobileGames,
    GamingNews,
    Events,
    Guides,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::PcGames,
        Category::ConsoleGames,
        Category::MobileGames,
        Category::GamingNews,
        Category::Events,
        Category::Guides,
    ];

    /// Storage encoding, 1 through 6.
    pub fn code(self) -> i16 {
        match self {
            Category::PcGames => 1,
            Category::ConsoleGames => 2,
            Category::MobileGames => 3,
            Category::GamingNews => 4,
            Category::Events => 5,
            Category::Guides => 6,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| i64::from(c.code()) == code)
    }

    pub fn slug(self) -> &'static str {
        match self {
            Category::PcGames => "pc-games",
            Category::ConsoleGames => "console-games",
            Category::MobileGames => "mobile-games",
            Category::GamingNews => "gaming-news",
            Category::Events => "events",
            Category::Guides => "guides",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Accepts either the slug (`"pc-games"`) or the numeric code (`"1"`).
impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| UnknownCategory(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Self::from_code(code)
                .ok_or_else(|| serde::de::Error::custom(UnknownCategory(code.to_string()))),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
