//! Weight-based rate limiting
//!
//! Each request acquires its endpoint weight from a semaphore sized to the
//! provider quota. Permits are held for the quota window and then released.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;

/// Sliding-window weight limiter
#[derive(Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    max_weight: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter allowing `max_weight` units per `window`
    pub fn weight_based(max_weight: u32, window: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_weight as usize)),
            max_weight,
            window,
        }
    }

    /// Quota per window
    pub fn max_weight(&self) -> u32 {
        self.max_weight
    }

    /// Weight currently available without waiting
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait until `weight` units are available and reserve them for one window
    pub async fn acquire(&self, weight: u32) -> Result<(), RateLimitError> {
        if weight > self.max_weight {
            return Err(RateLimitError::WeightExceedsQuota {
                weight,
                max_weight: self.max_weight,
            });
        }

        let permit = self
            .semaphore
            .clone()
            .acquire_many_owned(weight)
            .await
            .map_err(|e| RateLimitError::AcquireError(e.to_string()))?;

        let window = self.window;
        tokio::spawn(async move {
            sleep(window).await;
            drop(permit);
        });

        Ok(())
    }
}

/// Rate limiter errors
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Failed to acquire permits
    #[error("failed to acquire rate limit permits: {0}")]
    AcquireError(String),

    /// A single request can never fit in the quota
    #[error("request weight {weight} exceeds quota of {max_weight}")]
    WeightExceedsQuota {
        /// Requested weight
        weight: u32,
        /// Quota per window
        max_weight: u32,
    },
}
