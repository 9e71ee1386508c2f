//! In-memory HTTP response cache with TTL expiry, insertion-order eviction, and
//! conditional-request support.
//!
//! Keys canonicalize the query string by sorting its pairs, so parameter order never splits
//! the cache. Eviction is FIFO by insertion, deliberately not LRU-by-access: the cache bounds
//! memory, it does not chase hit rates. An entry whose age strictly exceeds its effective TTL
//! is expired; an age exactly equal to the TTL is still fresh. Live entries that carry an
//! `ETag` or `Last-Modified` validator still ask the caller to revalidate over the network,
//! trading a conditional round trip for correctness.

// self
use crate::{
	_prelude::*,
	config::CacheConfig,
	http::{RequestDescriptor, ResponseParts},
	obs::{ComponentKind, EventOutcome, record_component_event},
};

/// Canonical cache key derived from an HTTP method and a normalized URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);
impl CacheKey {
	/// Builds the key for a request descriptor.
	///
	/// Query pairs are sorted before joining, so `?a=1&b=2` and `?b=2&a=1` share one entry.
	pub fn for_request(request: &RequestDescriptor) -> Self {
		let url = &request.url;
		let mut key = format!("{} {}://{}{}", request.method, url.scheme(), url.authority(), url.path());
		let mut pairs =
			url.query_pairs().map(|(name, value)| format!("{name}={value}")).collect::<Vec<_>>();

		if !pairs.is_empty() {
			pairs.sort_unstable();

			key.push('?');
			key.push_str(&pairs.join("&"));
		}

		Self(key)
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Validators attached to a cached response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validators {
	/// `ETag` response header value.
	pub etag: Option<String>,
	/// `Last-Modified` response header value.
	pub last_modified: Option<String>,
}
impl Validators {
	/// Extracts validators from a response.
	pub fn from_response(response: &ResponseParts) -> Self {
		Self {
			etag: response.etag().map(str::to_owned),
			last_modified: response.last_modified().map(str::to_owned),
		}
	}

	/// True when neither validator is present.
	pub fn is_empty(&self) -> bool {
		self.etag.is_none() && self.last_modified.is_none()
	}
}

/// One cached response plus its freshness bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
	/// HTTP status the origin returned.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
	/// Validators extracted from the stored response.
	pub validators: Validators,
	/// Instant the response was written back.
	pub received_at: OffsetDateTime,
	/// Per-entry TTL override; falls back to the configured default when absent.
	pub ttl_override: Option<Duration>,
}
impl CacheEntry {
	fn is_expired(&self, default_ttl: Duration, now: OffsetDateTime) -> bool {
		now - self.received_at > self.ttl_override.unwrap_or(default_ttl)
	}
}

#[derive(Debug, Default)]
struct CacheInner {
	entries: HashMap<CacheKey, CacheEntry>,
	// Insertion order; front is the eviction candidate.
	order: VecDeque<CacheKey>,
}

/// Bounded in-memory response cache keyed by method + canonical URL.
#[derive(Debug)]
pub struct ResponseCache {
	config: CacheConfig,
	inner: Mutex<CacheInner>,
}
impl ResponseCache {
	/// Creates a cache with the given tuning.
	pub fn new(config: CacheConfig) -> Self {
		Self { config, inner: Mutex::new(CacheInner::default()) }
	}

	/// Returns the live entry for the request, if any, using the current wall clock.
	pub fn lookup(&self, request: &RequestDescriptor) -> Option<CacheEntry> {
		self.lookup_at(request, OffsetDateTime::now_utc())
	}

	/// Returns the live entry for the request as of `now`.
	///
	/// An expired entry is deleted as a side effect and reported as a miss.
	pub fn lookup_at(&self, request: &RequestDescriptor, now: OffsetDateTime) -> Option<CacheEntry> {
		if !self.config.enabled {
			return None;
		}

		let key = CacheKey::for_request(request);
		let mut inner = self.inner.lock();
		let hit = match inner.entries.get(&key) {
			Some(entry) if entry.is_expired(self.config.ttl, now) => {
				inner.entries.remove(&key);
				inner.order.retain(|stored| stored != &key);

				None
			},
			Some(entry) => Some(entry.clone()),
			None => None,
		};

		record_component_event(
			ComponentKind::Cache,
			if hit.is_some() { EventOutcome::Hit } else { EventOutcome::Miss },
		);

		hit
	}

	/// Writes a response back using the current wall clock and the default TTL.
	pub fn store(&self, request: &RequestDescriptor, response: &ResponseParts) {
		self.store_at(request, response, None, OffsetDateTime::now_utc());
	}

	/// Writes a response back with a per-entry TTL override.
	pub fn store_with_ttl(
		&self,
		request: &RequestDescriptor,
		response: &ResponseParts,
		ttl: Duration,
	) {
		self.store_at(request, response, Some(ttl), OffsetDateTime::now_utc());
	}

	/// Writes a response back as of `now`.
	///
	/// When the cache is full and the key is new, exactly one entry is evicted in insertion
	/// order. Re-storing an existing key refreshes the entry without consuming capacity and
	/// keeps its original eviction slot.
	pub fn store_at(
		&self,
		request: &RequestDescriptor,
		response: &ResponseParts,
		ttl_override: Option<Duration>,
		now: OffsetDateTime,
	) {
		if !self.config.enabled || self.config.max_entries == 0 {
			return;
		}

		let key = CacheKey::for_request(request);
		let entry = CacheEntry {
			status: response.status,
			body: response.body.clone(),
			validators: Validators::from_response(response),
			received_at: now,
			ttl_override,
		};
		let mut inner = self.inner.lock();

		if !inner.entries.contains_key(&key) {
			if inner.entries.len() >= self.config.max_entries
				&& let Some(oldest) = inner.order.pop_front()
			{
				inner.entries.remove(&oldest);
			}

			inner.order.push_back(key.clone());
		}

		inner.entries.insert(key, entry);
	}

	/// True when a live entry exists for the request but carries a validator, signaling the
	/// caller to revalidate over the network instead of trusting the copy blindly.
	pub fn wants_revalidation(&self, request: &RequestDescriptor) -> bool {
		self.wants_revalidation_at(request, OffsetDateTime::now_utc())
	}

	/// [`wants_revalidation`](Self::wants_revalidation) as of `now`.
	pub fn wants_revalidation_at(&self, request: &RequestDescriptor, now: OffsetDateTime) -> bool {
		self.lookup_at(request, now).is_some_and(|entry| !entry.validators.is_empty())
	}

	/// Injects `If-None-Match`/`If-Modified-Since` into the outgoing request when a live
	/// cached entry carries the matching validator; no-op otherwise.
	pub fn apply_conditional_headers(&self, request: &mut RequestDescriptor) {
		self.apply_conditional_headers_at(request, OffsetDateTime::now_utc());
	}

	/// [`apply_conditional_headers`](Self::apply_conditional_headers) as of `now`.
	pub fn apply_conditional_headers_at(
		&self,
		request: &mut RequestDescriptor,
		now: OffsetDateTime,
	) {
		let Some(entry) = self.lookup_at(request, now) else {
			return;
		};

		if let Some(etag) = &entry.validators.etag {
			request.set_header("If-None-Match", etag.clone());
		}
		if let Some(last_modified) = &entry.validators.last_modified {
			request.set_header("If-Modified-Since", last_modified.clone());
		}
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.inner.lock().entries.len()
	}

	/// True when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
