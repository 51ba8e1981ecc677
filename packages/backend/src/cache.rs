//! Cached route output.
//!
//! Listing pages read through a [`RouteCache`]; mutations revalidate the route,
//! dropping the cached value so the next read goes back to the backend. Failed
//! loads are never cached, and neither is a load that overlapped a
//! revalidation.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::Result;

#[derive(Debug)]
pub struct RouteCache<T> {
    path: &'static str,
    slot: RwLock<Option<T>>,
    generation: AtomicU64,
}

impl<T: Clone> RouteCache<T> {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            slot: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn get(&self) -> Option<T> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store(&self, value: T) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Drop the cached value. Returns whether anything was cached.
    pub fn invalidate(&self) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        slot.take().is_some()
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        let generation = self.generation.load(Ordering::SeqCst);
        let value = load().await?;

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) == generation {
            *slot = Some(value.clone());
        } else {
            tracing::debug!(path = self.path, "Route revalidated during load, not caching");
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    #[tokio::test]
    async fn test_loads_once_until_invalidated() {
        let cache = RouteCache::new("/notes");
        let mut loads = 0;

        let first = cache
            .get_or_load(|| {
                loads += 1;
                async { Ok(vec![1]) }
            })
            .await
            .unwrap();
        let second = cache
            .get_or_load(|| {
                loads += 1;
                async { Ok(vec![2]) }
            })
            .await
            .unwrap();
        assert_eq!(first, vec![1]);
        assert_eq!(second, vec![1]);
        assert_eq!(loads, 1);

        assert!(cache.invalidate());
        assert!(!cache.invalidate());
        let third = cache.get_or_load(|| async { Ok(vec![3]) }).await.unwrap();
        assert_eq!(third, vec![3]);
    }

    #[tokio::test]
    async fn test_load_overlapping_revalidation_is_not_cached() {
        let cache = RouteCache::new("/notes");

        let stale = cache
            .get_or_load(|| {
                let listing = vec!["old"];
                cache.invalidate();
                async move { Ok(listing) }
            })
            .await
            .unwrap();
        assert_eq!(stale, vec!["old"]);
        assert!(cache.get().is_none());

        let fresh = cache
            .get_or_load(|| async { Ok(vec!["old", "new"]) })
            .await
            .unwrap();
        assert_eq!(fresh, vec!["old", "new"]);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache: RouteCache<Vec<i32>> = RouteCache::new("/posts");
        let failed = cache
            .get_or_load(|| async { Err(BackendError::NotFound) })
            .await;
        assert!(failed.is_err());
        assert!(cache.get().is_none());
    }
}
