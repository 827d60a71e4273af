//! Core traits and types for the caching system.

use std::fmt::{self, Debug};
use std::hash::Hash;

use crate::retry::RetryOutcome;

/// Trait for entities that know their own cache key.
pub trait Cacheable: Clone {
  type Key: Eq + Hash + Clone + Debug;

  /// Key this entity is stored under (e.g. board name)
  fn cache_key(&self) -> Self::Key;
}

/// Why an entity could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
  /// The remote service answered and the entity does not exist
  NotFound,
  /// The remote service never answered within the retry budget
  Exhausted,
}

impl fmt::Display for Unresolved {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Unresolved::NotFound => f.write_str("not found"),
      Unresolved::Exhausted => f.write_str("retry budget exhausted"),
    }
  }
}

/// Result of resolving an entity through cache and remote service.
///
/// Public operations collapse this to `Option` with `.ok()`; the difference
/// between `NotFound` and `Exhausted` only reaches logs and tests.
pub type Lookup<T> = Result<T, Unresolved>;

impl<T> RetryOutcome<Option<T>> {
  /// Read a retried "find" call: `None` from the service means not found.
  pub fn into_lookup(self) -> Lookup<T> {
    match self {
      RetryOutcome::Succeeded {
        value: Some(value), ..
      } => Ok(value),
      RetryOutcome::Succeeded { value: None, .. } => Err(Unresolved::NotFound),
      RetryOutcome::Exhausted { .. } => Err(Unresolved::Exhausted),
    }
  }
}

impl<T> RetryOutcome<T> {
  /// Read a retried call whose success always carries a value.
  pub fn into_found(self) -> Lookup<T> {
    match self {
      RetryOutcome::Succeeded { value, .. } => Ok(value),
      RetryOutcome::Exhausted { .. } => Err(Unresolved::Exhausted),
    }
  }
}

/// Indicates where resolved data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  Cache,
  Remote,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lookup_from_retry_outcome() {
    let found = RetryOutcome::Succeeded {
      value: Some(4),
      attempts: 1,
    }
    .into_lookup();
    assert_eq!(found, Ok(4));

    let missing = RetryOutcome::<Option<u32>>::Succeeded {
      value: None,
      attempts: 2,
    }
    .into_lookup();
    assert_eq!(missing, Err(Unresolved::NotFound));

    let exhausted = RetryOutcome::<Option<u32>>::Exhausted {
      attempts: 30,
      last_error: "down".into(),
    }
    .into_lookup();
    assert_eq!(exhausted, Err(Unresolved::Exhausted));
  }

  #[test]
  fn test_into_found() {
    let exhausted = RetryOutcome::<u32>::Exhausted {
      attempts: 3,
      last_error: "down".into(),
    };
    assert_eq!(exhausted.into_found(), Err(Unresolved::Exhausted));
    assert_eq!(
      RetryOutcome::Succeeded {
        value: 1,
        attempts: 1
      }
      .into_found(),
      Ok(1)
    );
  }
}
