use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Required;

pub const DEFAULT_VARIANT: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub variant: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkTag {
    pub bookmark_id: i64,
    pub tag_id: i64,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct TagInput {
    pub name: Required,
    pub variant: Option<String>,
}

impl TagInput {
    pub fn variant(&self) -> &str {
        self.variant
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VARIANT)
    }
}
