//! Resolved configuration value object consumed by the core components.
//!
//! Loading these values (environment variables, files, secrets managers) is the embedding
//! service's responsibility; the core only reads a fully resolved [`RelayConfig`]. Every
//! section carries production defaults and `with_*` overrides for tests and embedders.

// self
use crate::_prelude::*;

/// Top-level configuration shared by the relay core components.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
	/// Response cache tuning.
	#[serde(default)]
	pub cache: CacheConfig,
	/// Request batcher tuning.
	#[serde(default)]
	pub batch: BatchConfig,
	/// Auth rate limiter tuning.
	#[serde(default)]
	pub rate_limit: RateLimitConfig,
	/// Outbound request tuning consumed by the dispatch layer above the core.
	#[serde(default)]
	pub request: RequestConfig,
	/// Secure token cache tuning.
	#[serde(default)]
	pub token_cache: TokenCacheConfig,
}
impl RelayConfig {
	/// Overrides the cache section.
	pub fn with_cache(mut self, cache: CacheConfig) -> Self {
		self.cache = cache;

		self
	}

	/// Overrides the batch section.
	pub fn with_batch(mut self, batch: BatchConfig) -> Self {
		self.batch = batch;

		self
	}

	/// Overrides the rate limit section.
	pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
		self.rate_limit = rate_limit;

		self
	}

	/// Overrides the request section.
	pub fn with_request(mut self, request: RequestConfig) -> Self {
		self.request = request;

		self
	}

	/// Overrides the token cache section.
	pub fn with_token_cache(mut self, token_cache: TokenCacheConfig) -> Self {
		self.token_cache = token_cache;

		self
	}
}

/// Response cache tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
	/// Disables the cache entirely when false; lookups miss and stores are no-ops.
	pub enabled: bool,
	/// Default time-to-live applied when an entry carries no override.
	pub ttl: Duration,
	/// Upper bound on stored entries; the oldest-inserted entry is evicted beyond it.
	pub max_entries: usize,
}
impl CacheConfig {
	/// Overrides the enabled flag.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;

		self
	}

	/// Overrides the default TTL.
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;

		self
	}

	/// Overrides the entry bound.
	pub fn with_max_entries(mut self, max_entries: usize) -> Self {
		self.max_entries = max_entries;

		self
	}
}
impl Default for CacheConfig {
	fn default() -> Self {
		Self { enabled: true, ttl: Duration::minutes(5), max_entries: 1_000 }
	}
}

/// Request batcher tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
	/// Disables batching entirely when false; requests execute as singleton batches.
	pub enabled: bool,
	/// Maximum wait before an incomplete group flushes.
	pub window: Duration,
	/// Pending count that triggers an immediate flush.
	pub max_size: usize,
}
impl BatchConfig {
	/// Overrides the enabled flag.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;

		self
	}

	/// Overrides the batch window.
	pub fn with_window(mut self, window: Duration) -> Self {
		self.window = window;

		self
	}

	/// Overrides the size threshold.
	pub fn with_max_size(mut self, max_size: usize) -> Self {
		self.max_size = max_size;

		self
	}
}
impl Default for BatchConfig {
	fn default() -> Self {
		Self { enabled: true, window: Duration::milliseconds(100), max_size: 10 }
	}
}

/// Auth rate limiter tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
	/// Disables limiting entirely when false; every attempt is allowed.
	pub enabled: bool,
	/// Attempts permitted per identifier within one window.
	pub max_attempts: u32,
	/// Fixed window length; the counter resets on the first attempt after it elapses.
	pub window: Duration,
}
impl RateLimitConfig {
	/// Overrides the enabled flag.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;

		self
	}

	/// Overrides the attempt budget.
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts;

		self
	}

	/// Overrides the window length.
	pub fn with_window(mut self, window: Duration) -> Self {
		self.window = window;

		self
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { enabled: true, max_attempts: 5, window: Duration::minutes(15) }
	}
}

/// Outbound request tuning.
///
/// The core performs no retries itself; these knobs are carried for the dispatch layer
/// that wraps the HTTP capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
	/// Per-request timeout.
	pub timeout: Duration,
	/// Retry attempts layered above dispatch.
	pub retries: u32,
	/// Delay between retry attempts.
	pub retry_delay: Duration,
}
impl RequestConfig {
	/// Overrides the timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the retry budget.
	pub fn with_retries(mut self, retries: u32) -> Self {
		self.retries = retries;

		self
	}

	/// Overrides the retry delay.
	pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
		self.retry_delay = retry_delay;

		self
	}
}
impl Default for RequestConfig {
	fn default() -> Self {
		Self { timeout: Duration::seconds(30), retries: 3, retry_delay: Duration::seconds(1) }
	}
}

/// Secure token cache tuning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCacheConfig {
	/// Default time-to-live for cached tokens without a per-entry override.
	pub ttl: Duration,
}
impl TokenCacheConfig {
	/// Overrides the default TTL.
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;

		self
	}
}
impl Default for TokenCacheConfig {
	fn default() -> Self {
		Self { ttl: Duration::minutes(5) }
	}
}
