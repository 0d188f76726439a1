use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown shelf '{0}'")]
pub struct ParseShelfError(String);

/// A named, ranked homepage collection. The string form is the stable
/// value stored in the featured table and used in API paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shelf {
    Spotlight,
    Trending,
    TopToday,
    TopWeek,
    TopMonth,
}

impl Shelf {
    pub const ALL: [Self; 5] = [
        Self::Spotlight,
        Self::Trending,
        Self::TopToday,
        Self::TopWeek,
        Self::TopMonth,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spotlight => "spotlight",
            Self::Trending => "trending",
            Self::TopToday => "top_today",
            Self::TopWeek => "top_week",
            Self::TopMonth => "top_month",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shelf {
    type Err = ParseShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spotlight" => Ok(Self::Spotlight),
            "trending" => Ok(Self::Trending),
            "top_today" => Ok(Self::TopToday),
            "top_week" => Ok(Self::TopWeek),
            "top_month" => Ok(Self::TopMonth),
            other => Err(ParseShelfError(other.to_string())),
        }
    }
}
