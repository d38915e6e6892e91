use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::errors::WebsiteError;

/// Stable identifier of a saved website. Assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebsiteId(Uuid);

impl WebsiteId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WebsiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WebsiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WebsiteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A saved website.
///
/// `title` and `link` never change after creation; only `is_favorite` is
/// mutable, and only through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: WebsiteId,
    pub title: String,
    pub link: String,
    pub is_favorite: bool,
    pub created_at: i64,
}

impl Website {
    /// Parses `link` into a URL suitable for handing to a page renderer.
    ///
    /// The store accepts any string as a link, so this is the first point at
    /// which a malformed link is reported.
    pub fn url(&self) -> Result<Url, WebsiteError> {
        Url::parse(&self.link)
            .map_err(|e| WebsiteError::InvalidLink(format!("{}: {}", self.link, e)))
    }
}

/// Which subset of saved websites a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Favorites,
}

impl FromStr for ListFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ListFilter::All),
            "favorites" => Ok(ListFilter::Favorites),
            other => Err(format!("unknown list filter: {}", other)),
        }
    }
}
