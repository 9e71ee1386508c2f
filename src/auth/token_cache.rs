//! Short-TTL cache mapping a logical key to a validated token, avoiding repeated
//! validation cost.

// self
use crate::{
	_prelude::*,
	auth::secret::TokenSecret,
	config::TokenCacheConfig,
	obs::{ComponentKind, EventOutcome, record_component_event},
};

/// One cached token plus its freshness bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedToken {
	/// The validated token, redacted in logs.
	pub token: TokenSecret,
	/// Content fingerprint kept for integrity checks and debugging, not for lookup.
	pub fingerprint: String,
	/// Instant the token was cached.
	pub stored_at: OffsetDateTime,
	/// Instant after which the token is no longer served.
	pub expires_at: OffsetDateTime,
}

/// In-memory token cache with lazy expiry.
#[derive(Debug)]
pub struct SecureTokenCache {
	config: TokenCacheConfig,
	entries: Mutex<HashMap<String, CachedToken>>,
}
impl SecureTokenCache {
	/// Creates a cache with the given tuning.
	pub fn new(config: TokenCacheConfig) -> Self {
		Self { config, entries: Mutex::new(HashMap::new()) }
	}

	/// Caches a token under the key, using the current wall clock and the default TTL
	/// unless overridden.
	pub fn set(&self, key: impl Into<String>, token: TokenSecret, ttl: Option<Duration>) {
		self.set_at(key, token, ttl, OffsetDateTime::now_utc());
	}

	/// [`set`](Self::set) as of `now`.
	pub fn set_at(
		&self,
		key: impl Into<String>,
		token: TokenSecret,
		ttl: Option<Duration>,
		now: OffsetDateTime,
	) {
		let entry = CachedToken {
			fingerprint: token.fingerprint(),
			token,
			stored_at: now,
			expires_at: now + ttl.unwrap_or(self.config.ttl),
		};

		self.entries.lock().insert(key.into(), entry);
	}

	/// Returns the cached token for the key, if still fresh, using the current wall clock.
	pub fn get(&self, key: &str) -> Option<CachedToken> {
		self.get_at(key, OffsetDateTime::now_utc())
	}

	/// [`get`](Self::get) as of `now`.
	///
	/// An entry past `expires_at` (strictly greater) is deleted as a side effect and
	/// reported as a miss.
	pub fn get_at(&self, key: &str, now: OffsetDateTime) -> Option<CachedToken> {
		let mut entries = self.entries.lock();
		let hit = match entries.get(key) {
			Some(entry) if now > entry.expires_at => {
				entries.remove(key);

				None
			},
			Some(entry) => Some(entry.clone()),
			None => None,
		};

		record_component_event(
			ComponentKind::TokenCache,
			if hit.is_some() { EventOutcome::Hit } else { EventOutcome::Miss },
		);

		hit
	}

	/// Drops the entry for the key; returns whether one existed.
	pub fn invalidate(&self, key: &str) -> bool {
		self.entries.lock().remove(key).is_some()
	}

	/// Drops every cached token.
	pub fn clear(&self) {
		self.entries.lock().clear();
	}

	/// Number of cached tokens, expired stragglers included.
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// True when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
