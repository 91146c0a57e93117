//! Fetcher configuration.

use std::time::Duration;

/// How failed page requests are retried.
///
/// Only errors for which [`migration_repository::SourceError::is_retryable`]
/// holds are retried. The default performs no retries, so the first failure
/// ends the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first request.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for the doubled delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff starting at `initial_delay`, doubling up to `max_delay`.
    pub fn exponential(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay: max_delay.max(initial_delay),
        }
    }

    /// Delay to wait before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Upper bound for the data channel capacity, whatever the page size.
pub const MAX_BUFFER_SIZE: usize = 1 << 16;

/// Configuration for the paginated fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Records requested per page.
    pub page_size: u64,
    /// Data channel capacity as a multiple of `page_size`.
    pub buffer_multiplier: usize,
    /// Retry behaviour for failed page requests.
    pub retry: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            buffer_multiplier: 2,
            retry: RetryPolicy::none(),
        }
    }
}

impl FetcherConfig {
    /// Capacity of the data channel for a given page size, capped at
    /// [`MAX_BUFFER_SIZE`].
    pub fn buffer_size(&self, page_size: u64) -> usize {
        usize::try_from(page_size)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.buffer_multiplier.max(1))
            .clamp(1, MAX_BUFFER_SIZE)
    }
}
