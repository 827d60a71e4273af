//! Cache-first resolution on top of `EntityCache`.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use tracing::debug;

use super::storage::EntityCache;
use super::traits::{CacheSource, Lookup};

impl<K, V> EntityCache<K, V>
where
  K: Eq + Hash + Debug + Clone,
  V: Clone,
{
  /// Resolve `key` cache-first.
  ///
  /// 1. Cached entry: return it without calling `fetcher`
  /// 2. Otherwise run `fetcher` (normally a retried remote call)
  /// 3. Store a found entity; misses leave the cache untouched
  pub async fn resolve<F, Fut>(&mut self, key: &K, fetcher: F) -> (Lookup<V>, CacheSource)
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Lookup<V>>,
  {
    if let Some(cached) = self.get(key) {
      debug!("{} cache hit for {:?}", self.name(), key);
      return (Ok(cached), CacheSource::Cache);
    }

    debug!("{} cache miss for {:?}, querying remote", self.name(), key);
    let lookup = fetcher().await;
    if let Ok(value) = &lookup {
      self.put(key.clone(), value.clone());
    }
    (lookup, CacheSource::Remote)
  }
}
