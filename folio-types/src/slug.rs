use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Name of a document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionSlug {
    Users,
    Pages,
    Media,
}

impl CollectionSlug {
    pub const ALL: [CollectionSlug; 3] = [Self::Users, Self::Pages, Self::Media];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Pages => "pages",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for CollectionSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionSlug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slug| slug.as_str() == s)
            .ok_or_else(|| Error::UnknownCollection(s.to_string()))
    }
}

/// Name of a singleton global document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalSlug {
    Settings,
}

impl GlobalSlug {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for GlobalSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlobalSlug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "settings" => Ok(Self::Settings),
            other => Err(Error::UnknownGlobal(other.to_string())),
        }
    }
}
