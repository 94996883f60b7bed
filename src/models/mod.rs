pub mod bookmark;
pub mod required;
pub mod tag;

pub use bookmark::{Bookmark, BookmarkFilter, BookmarkInput, BookmarkWithTags, Upserted};
pub use required::Required;
pub use tag::{BookmarkTag, Tag, TagInput};

/// Current time as unix milliseconds, the unit stored in every timestamp column.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
