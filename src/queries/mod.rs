//! Parameterized statements over the bookmark store.

pub mod bookmarks;
pub mod tags;
