use serde::Deserialize;
use sqlx::SqlitePool;
use std::fs;

use crate::queries::{bookmarks, tags};

#[derive(Debug, Deserialize)]
struct ImportedBookmark {
    name: String,
    href: String,
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    tags: Vec<String>,
}

/// Import a JSON array of bookmarks, upserting each one by name.
///
/// Re-running an import is harmless: existing bookmarks get the imported
/// href and finished flag, and tag links that already exist are kept.
pub async fn import_bookmarks(pool: &SqlitePool, file_path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file_path)?;
    let entries: Vec<ImportedBookmark> = serde_json::from_str(&content)?;

    let mut imported = 0;

    for entry in entries {
        let name = entry.name.trim();
        let href = entry.href.trim();
        if name.is_empty() || href.is_empty() {
            tracing::warn!("Skipping bookmark without name or href: {entry:?}");
            continue;
        }

        let upserted = bookmarks::upsert_bookmark(pool, name, href).await?;
        bookmarks::set_finished(pool, upserted.id, entry.finished).await?;

        for tag_name in &entry.tags {
            let tag_name = tag_name.trim();
            if tag_name.is_empty() {
                continue;
            }

            let tag = tags::find_or_create_tag(pool, tag_name).await?;
            tags::ensure_tag_link(pool, upserted.id, tag.id).await?;
        }

        imported += 1;
    }

    Ok(imported)
}
