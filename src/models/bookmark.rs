use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Required, Tag};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: i64,
    pub name: String,
    pub href: String,
    pub finished: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A bookmark together with every tag linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkWithTags {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
pub struct BookmarkInput {
    pub name: Required,
    pub href: Required,
}

/// Outcome of an upsert keyed by bookmark name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Upserted {
    #[serde(skip)]
    pub id: i64,
    pub created: bool,
}

/// Filters accepted by the live search path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkFilter {
    pub q: Option<String>,
    pub finished: Option<bool>,
}

impl BookmarkFilter {
    /// Blank search strings count as no search at all.
    pub fn new(q: Option<String>, finished: Option<bool>) -> Self {
        Self {
            q: q.filter(|q| !q.trim().is_empty()),
            finished,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.finished.is_none()
    }
}
