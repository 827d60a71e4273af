//! Bounded retry with a fixed pause between attempts.

use color_eyre::Result;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

/// Retry budget for a single remote call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
  /// Total attempts, including the first
  pub max_attempts: u32,
  /// Pause between consecutive attempts, in seconds
  pub interval_secs: u64,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 30,
      interval_secs: 2,
    }
  }
}

impl RetryPolicy {
  /// Policy that retries without pausing. Used by tests and the sandbox CLI.
  pub fn immediate(max_attempts: u32) -> Self {
    Self {
      max_attempts,
      interval_secs: 0,
    }
  }

  pub fn interval(&self) -> Duration {
    Duration::from_secs(self.interval_secs)
  }
}

/// Result of running an operation under a retry budget.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T> {
  Succeeded { value: T, attempts: u32 },
  /// Every attempt failed. Carries the last error message for diagnostics.
  Exhausted { attempts: u32, last_error: String },
}

impl<T> RetryOutcome<T> {
  pub fn into_option(self) -> Option<T> {
    match self {
      RetryOutcome::Succeeded { value, .. } => Some(value),
      RetryOutcome::Exhausted { .. } => None,
    }
  }

  pub fn attempts(&self) -> u32 {
    match self {
      RetryOutcome::Succeeded { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
        *attempts
      }
    }
  }

  pub fn is_exhausted(&self) -> bool {
    matches!(self, RetryOutcome::Exhausted { .. })
  }
}

/// Runs remote calls under a `RetryPolicy`.
///
/// Any `Err` from the operation is treated as retryable. The retrier never
/// returns the underlying error; exhaustion is reported as
/// `RetryOutcome::Exhausted`.
#[derive(Debug, Clone, Copy)]
pub struct Retrier {
  policy: RetryPolicy,
}

impl Retrier {
  pub fn new(policy: RetryPolicy) -> Self {
    Self { policy }
  }

  /// Execute `operation` until it succeeds or the attempt budget runs out.
  ///
  /// `operation_name` only labels log lines.
  pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> RetryOutcome<T>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    let max_attempts = self.policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
      attempt += 1;

      match operation().await {
        Ok(value) => {
          if attempt > 1 {
            info!("{} succeeded on attempt {}", operation_name, attempt);
          }
          return RetryOutcome::Succeeded {
            value,
            attempts: attempt,
          };
        }
        Err(e) => {
          if attempt >= max_attempts {
            error!(
              "{} failed after {} attempts, giving up: {}",
              operation_name, attempt, e
            );
            return RetryOutcome::Exhausted {
              attempts: attempt,
              last_error: e.to_string(),
            };
          }

          warn!(
            "{} attempt {}/{} failed: {}. Retrying in {:?}",
            operation_name,
            attempt,
            max_attempts,
            e,
            self.policy.interval()
          );
          tokio::time::sleep(self.policy.interval()).await;
        }
      }
    }
  }
}

impl Default for Retrier {
  fn default() -> Self {
    Self::new(RetryPolicy::default())
  }
}
