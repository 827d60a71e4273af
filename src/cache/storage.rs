//! In-memory entity storage.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use super::traits::Cacheable;

/// Unbounded map from key to entity.
///
/// Entries are never evicted or expired. Access is through `&mut self`, so
/// one cache is only ever touched by one caller at a time.
#[derive(Debug, Clone)]
pub struct EntityCache<K, V> {
  /// Entity name used in log lines (e.g. "board")
  name: &'static str,
  entries: HashMap<K, V>,
}

impl<K, V> EntityCache<K, V>
where
  K: Eq + Hash + Debug,
  V: Clone,
{
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      entries: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn get(&self, key: &K) -> Option<V> {
    self.entries.get(key).cloned()
  }

  pub fn put(&mut self, key: K, value: V) {
    self.entries.insert(key, value);
  }

  /// Drop one entry. Only used when this layer itself changed the entity.
  pub fn remove(&mut self, key: &K) -> Option<V> {
    self.entries.remove(key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<V> EntityCache<V::Key, V>
where
  V: Cacheable,
{
  /// Store an entity under its own key. Last write wins.
  pub fn put_entity(&mut self, entity: V) {
    self.entries.insert(entity.cache_key(), entity);
  }
}
