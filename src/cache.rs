//! In-memory snapshot of every bookmark with its tags.
//!
//! Unfiltered list reads are answered from here. Writers call
//! [`BookmarkCache::schedule_refresh`] once their change has committed; the
//! rebuild runs on a background task and swaps in a fresh snapshot when done.
//!
//! At most one rebuild runs at a time. A refresh requested while another is
//! running is remembered as a single pending flag, so any number of triggers
//! during a rebuild collapse into exactly one follow-up rebuild. Readers may see
//! stale data until that follow-up completes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::config::ListOrder;
use crate::error::AppError;
use crate::models::BookmarkWithTags;
use crate::queries;

#[derive(Clone)]
pub struct BookmarkCache {
    inner: Arc<Inner>,
}

struct Inner {
    db: SqlitePool,
    order: ListOrder,
    snapshot: RwLock<Arc<Vec<BookmarkWithTags>>>,
    refresh: Mutex<RefreshState>,
    idle: watch::Sender<bool>,
}

#[derive(Default)]
struct RefreshState {
    running: bool,
    pending: bool,
}

impl BookmarkCache {
    /// An empty cache that has not read the store yet.
    pub fn new(db: SqlitePool, order: ListOrder) -> Self {
        let (idle, _) = watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                db,
                order,
                snapshot: RwLock::new(Arc::new(Vec::new())),
                refresh: Mutex::new(RefreshState::default()),
                idle,
            }),
        }
    }

    /// Build a cache and fill it from the store before returning.
    pub async fn load(db: SqlitePool, order: ListOrder) -> Result<Self, AppError> {
        let cache = Self::new(db, order);
        let count = cache.reload().await?;
        tracing::info!("bookmark cache loaded with {count} entries");
        Ok(cache)
    }

    pub fn snapshot(&self) -> Arc<Vec<BookmarkWithTags>> {
        let guard = self
            .inner
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Rebuild the snapshot now. On failure the previous snapshot stays.
    pub async fn reload(&self) -> Result<usize, AppError> {
        let fresh = queries::bookmarks::list_with_tags(&self.inner.db, self.inner.order).await?;
        let count = fresh.len();

        let mut guard = self
            .inner
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(fresh);

        Ok(count)
    }

    /// Ask for a rebuild without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule_refresh(&self) {
        {
            let mut state = self.lock_state();
            if state.running {
                state.pending = true;
                tracing::debug!("cache refresh already running, marked pending");
                return;
            }
            state.running = true;
            self.inner.idle.send_replace(false);
        }

        let cache = self.clone();
        tokio::spawn(async move { cache.run_refreshes().await });
    }

    /// Resolves once no rebuild is running or pending.
    pub async fn wait_idle(&self) {
        let mut idle = self.inner.idle.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = idle.wait_for(|done| *done).await;
    }

    async fn run_refreshes(&self) {
        loop {
            match self.reload().await {
                Ok(count) => tracing::debug!("cache refreshed with {count} entries"),
                Err(e) => tracing::error!("Cache refresh failed, keeping stale snapshot: {e}"),
            }

            let again = {
                let mut state = self.lock_state();
                if state.pending {
                    state.pending = false;
                    true
                } else {
                    state.running = false;
                    self.inner.idle.send_replace(true);
                    false
                }
            };

            if !again {
                break;
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.inner
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
