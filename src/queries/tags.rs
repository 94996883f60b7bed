use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{now_millis, BookmarkTag, Tag};

pub async fn list_tags(db: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as("SELECT * FROM tag ORDER BY name ASC, id ASC")
        .fetch_all(db)
        .await?;
    Ok(tags)
}

pub async fn insert_tag(db: &SqlitePool, name: &str, variant: &str) -> Result<Tag, AppError> {
    let now = now_millis();

    let tag = sqlx::query_as(
        r#"
        INSERT INTO tag (name, variant, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(variant)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await?;

    Ok(tag)
}

pub async fn update_tag(db: &SqlitePool, id: i64, name: &str, variant: &str) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE tag SET name = ?, variant = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(variant)
        .bind(now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_tag(db: &SqlitePool, id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM tag WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Look up a tag by exact name, creating it with the default variant if absent.
pub async fn find_or_create_tag(db: &SqlitePool, name: &str) -> Result<Tag, AppError> {
    let existing: Option<Tag> = sqlx::query_as("SELECT * FROM tag WHERE name = ? ORDER BY id LIMIT 1")
        .bind(name)
        .fetch_optional(db)
        .await?;

    match existing {
        Some(tag) => Ok(tag),
        None => insert_tag(db, name, crate::models::tag::DEFAULT_VARIANT).await,
    }
}

/// Links a bookmark to a tag. Foreign keys are not enforced, so both ids are
/// checked here; an unknown id or an existing link is a constraint error.
pub async fn attach_tag(db: &SqlitePool, bookmark_id: i64, tag_id: i64) -> Result<BookmarkTag, AppError> {
    let link = sqlx::query_as(
        r#"
        INSERT INTO bookmark_tag (bookmark_id, tag_id, created_at)
        SELECT ?, ?, ?
        WHERE EXISTS (SELECT 1 FROM bookmark WHERE id = ?)
          AND EXISTS (SELECT 1 FROM tag WHERE id = ?)
        RETURNING *
        "#,
    )
    .bind(bookmark_id)
    .bind(tag_id)
    .bind(now_millis())
    .bind(bookmark_id)
    .bind(tag_id)
    .fetch_optional(db)
    .await?;

    link.ok_or_else(|| AppError::Constraint(format!("no bookmark {bookmark_id} or tag {tag_id}")))
}

/// Like [`attach_tag`], but an existing link is left alone.
pub async fn ensure_tag_link(db: &SqlitePool, bookmark_id: i64, tag_id: i64) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO bookmark_tag (bookmark_id, tag_id, created_at) VALUES (?, ?, ?)")
        .bind(bookmark_id)
        .bind(tag_id)
        .bind(now_millis())
        .execute(db)
        .await?;
    Ok(())
}

pub async fn detach_tag(db: &SqlitePool, bookmark_id: i64, tag_id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM bookmark_tag WHERE bookmark_id = ? AND tag_id = ?")
        .bind(bookmark_id)
        .bind(tag_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
