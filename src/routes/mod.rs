pub mod bookmarks;
pub mod tags;
