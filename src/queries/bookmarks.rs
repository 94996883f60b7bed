use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::ListOrder;
use crate::error::AppError;
use crate::models::{now_millis, Bookmark, BookmarkFilter, BookmarkWithTags, Tag, Upserted};

pub async fn list_bookmarks(db: &SqlitePool, order: ListOrder) -> Result<Vec<Bookmark>, AppError> {
    let sql = format!("SELECT * FROM bookmark ORDER BY id {}", order.as_sql());
    let bookmarks = sqlx::query_as(&sql).fetch_all(db).await?;
    Ok(bookmarks)
}

/// Live search over bookmark names, optionally restricted by completion.
pub async fn search_bookmarks(
    db: &SqlitePool,
    filter: &BookmarkFilter,
    order: ListOrder,
) -> Result<Vec<Bookmark>, AppError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM bookmark WHERE 1 = 1");

    if let Some(q) = &filter.q {
        query
            .push(" AND name LIKE ")
            .push_bind(format!("%{}%", escape_like(q)))
            .push(" ESCAPE '\\'");
    }

    if let Some(finished) = filter.finished {
        query.push(" AND finished = ").push_bind(finished);
    }

    query.push(" ORDER BY id ").push(order.as_sql());

    let bookmarks = query.build_query_as::<Bookmark>().fetch_all(db).await?;
    Ok(bookmarks)
}

fn escape_like(q: &str) -> String {
    let mut escaped = String::with_capacity(q.len());
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Links whose tag has been deleted drop out of the join.
pub async fn tags_for_bookmark(db: &SqlitePool, bookmark_id: i64) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as(
        r#"
        SELECT t.* FROM tag t
        JOIN bookmark_tag bt ON bt.tag_id = t.id
        WHERE bt.bookmark_id = ?
        ORDER BY t.name ASC
        "#,
    )
    .bind(bookmark_id)
    .fetch_all(db)
    .await?;
    Ok(tags)
}

pub async fn with_tags(
    db: &SqlitePool,
    bookmarks: Vec<Bookmark>,
) -> Result<Vec<BookmarkWithTags>, AppError> {
    let mut enriched = Vec::with_capacity(bookmarks.len());

    for bookmark in bookmarks {
        let tags = tags_for_bookmark(db, bookmark.id).await?;
        enriched.push(BookmarkWithTags { bookmark, tags });
    }

    Ok(enriched)
}

pub async fn list_with_tags(
    db: &SqlitePool,
    order: ListOrder,
) -> Result<Vec<BookmarkWithTags>, AppError> {
    let bookmarks = list_bookmarks(db, order).await?;
    with_tags(db, bookmarks).await
}

pub async fn insert_bookmark(db: &SqlitePool, name: &str, href: &str) -> Result<Bookmark, AppError> {
    let now = now_millis();

    let bookmark = sqlx::query_as(
        r#"
        INSERT INTO bookmark (name, href, finished, created_at, updated_at)
        VALUES (?, ?, 0, ?, ?)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(href)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await?;

    Ok(bookmark)
}

/// Insert a bookmark unless one with the same name exists, in which case
/// its href is replaced.
///
/// The existence check lives inside the insert statement itself, so two
/// concurrent upserts of one name serialize on SQLite's write lock and only
/// the first inserts.
pub async fn upsert_bookmark(db: &SqlitePool, name: &str, href: &str) -> Result<Upserted, AppError> {
    let now = now_millis();
    let mut tx = db.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO bookmark (name, href, finished, created_at, updated_at)
        SELECT ?, ?, 0, ?, ?
        WHERE NOT EXISTS (SELECT 1 FROM bookmark WHERE name = ?)
        "#,
    )
    .bind(name)
    .bind(href)
    .bind(now)
    .bind(now)
    .bind(name)
    .execute(&mut *tx)
    .await?;

    let created = inserted.rows_affected() > 0;

    if !created {
        sqlx::query("UPDATE bookmark SET href = ?, updated_at = ? WHERE name = ?")
            .bind(href)
            .bind(now)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    let (id,): (i64,) = sqlx::query_as("SELECT id FROM bookmark WHERE name = ? ORDER BY id LIMIT 1")
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Upserted { id, created })
}

/// Returns the number of rows touched; zero means the id does not exist.
pub async fn update_bookmark(
    db: &SqlitePool,
    id: i64,
    name: &str,
    href: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE bookmark SET name = ?, href = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(href)
        .bind(now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_finished(db: &SqlitePool, id: i64, finished: bool) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE bookmark SET finished = ?, updated_at = ? WHERE id = ?")
        .bind(finished)
        .bind(now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Tag links are not cascaded: the bookmark's `bookmark_tag` rows stay behind.
pub async fn delete_bookmark(db: &SqlitePool, id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM bookmark WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("rust"), "rust");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
