//! Entity lookup cache using moka
//!
//! Wraps any [`EntityLookup`] with per-kind TTL caches. Only successful
//! fetches are stored, so a failed lookup is retried on the next navigation.

use crate::error::LookupError;
use crate::lookup::{AgencyRecord, ClientRecord, EntityLookup, SystemRecord};
use async_trait::async_trait;
use moka::future::Cache;
use std::future::Future;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupCacheStats {
    /// Cached systems
    pub systems: u64,
    /// Cached agencies
    pub agencies: u64,
    /// Cached clients
    pub clients: u64,
}

/// Caching decorator for an entity lookup
#[derive(Debug, Clone)]
pub struct CachedLookup<L> {
    inner: L,
    systems: Cache<String, SystemRecord>,
    agencies: Cache<String, AgencyRecord>,
    clients: Cache<String, ClientRecord>,
}

impl<L: EntityLookup> CachedLookup<L> {
    /// Create cache with max capacity per kind and time-to-live
    #[must_use]
    pub fn new(inner: L, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            systems: build(max_capacity, ttl),
            agencies: build(max_capacity, ttl),
            clients: build(max_capacity, ttl),
        }
    }

    /// Wrapped lookup
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Forget one system
    pub async fn invalidate_system(&self, id: &str) {
        self.systems.invalidate(id).await;
    }

    /// Forget one agency
    pub async fn invalidate_agency(&self, id: &str) {
        self.agencies.invalidate(id).await;
    }

    /// Forget one client
    pub async fn invalidate_client(&self, id: &str) {
        self.clients.invalidate(id).await;
    }

    /// Forget everything
    ///
    /// Ancestry is denormalized into agency and client entries, so renaming
    /// a system or agency should invalidate all.
    pub fn invalidate_all(&self) {
        self.systems.invalidate_all();
        self.agencies.invalidate_all();
        self.clients.invalidate_all();
    }

    /// Approximate entry counts
    #[must_use]
    pub fn stats(&self) -> LookupCacheStats {
        LookupCacheStats {
            systems: self.systems.entry_count(),
            agencies: self.agencies.entry_count(),
            clients: self.clients.entry_count(),
        }
    }

    /// Flush pending cache maintenance so counts are exact
    pub async fn sync(&self) {
        self.systems.run_pending_tasks().await;
        self.agencies.run_pending_tasks().await;
        self.clients.run_pending_tasks().await;
    }
}

fn build<V: Clone + Send + Sync + 'static>(max_capacity: u64, ttl: Duration) -> Cache<String, V> {
    Cache::builder()
        .max_capacity(max_capacity)
        .time_to_live(ttl)
        .build()
}

async fn cached<V, F, Fut>(cache: &Cache<String, V>, id: &str, fetch: F) -> Result<V, LookupError>
where
    V: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, LookupError>>,
{
    if let Some(hit) = cache.get(id).await {
        return Ok(hit);
    }

    let value = fetch().await?;
    cache.insert(id.to_string(), value.clone()).await;
    Ok(value)
}

#[async_trait]
impl<L: EntityLookup> EntityLookup for CachedLookup<L> {
    async fn get_system(&self, id: &str) -> Result<SystemRecord, LookupError> {
        cached(&self.systems, id, || self.inner.get_system(id)).await
    }

    async fn get_agency(&self, id: &str) -> Result<AgencyRecord, LookupError> {
        cached(&self.agencies, id, || self.inner.get_agency(id)).await
    }

    async fn get_client(&self, id: &str) -> Result<ClientRecord, LookupError> {
        cached(&self.clients, id, || self.inner.get_client(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taskhub_access::EntityKind;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EntityLookup for Counting {
        async fn get_system(&self, id: &str) -> Result<SystemRecord, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id == "missing" {
                return Err(LookupError::not_found(EntityKind::System, id));
            }
            Ok(SystemRecord {
                id: id.to_string(),
                name: format!("System {id}"),
            })
        }

        async fn get_agency(&self, id: &str) -> Result<AgencyRecord, LookupError> {
            Err(LookupError::not_found(EntityKind::Agency, id))
        }

        async fn get_client(&self, id: &str) -> Result<ClientRecord, LookupError> {
            Err(LookupError::not_found(EntityKind::Client, id))
        }
    }

    fn cache() -> CachedLookup<Counting> {
        CachedLookup::new(Counting::default(), 100, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let lookup = cache();
        let first = lookup.get_system("S1").await.unwrap();
        let second = lookup.get_system("S1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(lookup.inner().calls.load(Ordering::SeqCst), 1);
        lookup.sync().await;
        assert_eq!(lookup.stats().systems, 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let lookup = cache();
        assert!(lookup.get_system("missing").await.is_err());
        assert!(lookup.get_system("missing").await.is_err());
        assert_eq!(lookup.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let lookup = cache();
        lookup.get_system("S1").await.unwrap();
        lookup.invalidate_system("S1").await;
        lookup.get_system("S1").await.unwrap();
        assert_eq!(lookup.inner().calls.load(Ordering::SeqCst), 2);
    }
}
