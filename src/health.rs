//! Rolling request/auth/cache counters derived into a tri-state health verdict.
//!
//! Recording mutates counters behind a lock; [`HealthMonitor::snapshot`] is a pure read that
//! derives four boolean checks and a status without touching state, so repeated snapshots
//! over unchanged counters are deterministic.

// self
use crate::_prelude::*;

/// Number of latency samples retained in the rolling window.
pub const LATENCY_WINDOW: usize = 1_000;

const SUCCESS_RATE_FLOOR: f64 = 0.95;
const LATENCY_CEILING_MS: f64 = 5_000.;
const AUTH_FAILURE_RATIO_CAP: f64 = 0.1;
const ERROR_QUIET_WINDOW: Duration = Duration::minutes(5);
const DEGRADED_FLOOR: f64 = 0.7;

/// Outcome labels recorded for each authentication attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthOutcome {
	/// Authentication succeeded.
	Success,
	/// Authentication failed.
	Failure,
	/// Attempt was refused by the rate limiter before being evaluated.
	RateLimited,
}

/// Request counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTotals {
	/// All recorded requests.
	pub total: u64,
	/// Requests recorded as successful.
	pub success: u64,
	/// Requests recorded as failed.
	pub failure: u64,
}

/// Authentication counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTotals {
	/// Successful authentications.
	pub success: u64,
	/// Failed authentications.
	pub failure: u64,
	/// Attempts refused by the rate limiter.
	pub rate_limited: u64,
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTotals {
	/// Lookups served from cache.
	pub hits: u64,
	/// Lookups that went to the network.
	pub misses: u64,
}

/// Most recent recorded error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
	/// Rendered error message.
	pub message: String,
	/// Instant the error was recorded.
	pub occurred_at: OffsetDateTime,
}

#[derive(Debug)]
struct MetricsInner {
	started_at: OffsetDateTime,
	requests: RequestTotals,
	latencies: VecDeque<Duration>,
	latency_sum: Duration,
	auth: AuthTotals,
	cache: CacheTotals,
	last_error: Option<LastError>,
}

/// Aggregates request, auth, and cache events into a derived health verdict.
#[derive(Debug)]
pub struct HealthMonitor {
	inner: Mutex<MetricsInner>,
}
impl HealthMonitor {
	/// Creates a monitor whose uptime starts now.
	pub fn new() -> Self {
		Self::started_at(OffsetDateTime::now_utc())
	}

	/// Creates a monitor with an explicit start instant.
	pub fn started_at(started_at: OffsetDateTime) -> Self {
		Self {
			inner: Mutex::new(MetricsInner {
				started_at,
				requests: RequestTotals::default(),
				latencies: VecDeque::with_capacity(LATENCY_WINDOW),
				latency_sum: Duration::ZERO,
				auth: AuthTotals::default(),
				cache: CacheTotals::default(),
				last_error: None,
			}),
		}
	}

	/// Records one completed request and its latency.
	///
	/// The latency enters the rolling window regardless of outcome; only the success and
	/// failure counters distinguish the two.
	pub fn record_request(&self, success: bool, latency: Duration) {
		let mut inner = self.inner.lock();

		inner.requests.total += 1;

		if success {
			inner.requests.success += 1;
		} else {
			inner.requests.failure += 1;
		}

		if inner.latencies.len() == LATENCY_WINDOW
			&& let Some(oldest) = inner.latencies.pop_front()
		{
			inner.latency_sum -= oldest;
		}

		inner.latencies.push_back(latency);
		inner.latency_sum += latency;
	}

	/// Records one authentication attempt.
	pub fn record_auth(&self, outcome: AuthOutcome) {
		let mut inner = self.inner.lock();

		match outcome {
			AuthOutcome::Success => inner.auth.success += 1,
			AuthOutcome::Failure => inner.auth.failure += 1,
			AuthOutcome::RateLimited => inner.auth.rate_limited += 1,
		}
	}

	/// Records one cache lookup outcome.
	pub fn record_cache_hit(&self, hit: bool) {
		let mut inner = self.inner.lock();

		if hit {
			inner.cache.hits += 1;
		} else {
			inner.cache.misses += 1;
		}
	}

	/// Records an error message with the current wall clock.
	pub fn record_error(&self, message: impl Into<String>) {
		self.record_error_at(message, OffsetDateTime::now_utc());
	}

	/// [`record_error`](Self::record_error) with an explicit instant.
	pub fn record_error_at(&self, message: impl Into<String>, occurred_at: OffsetDateTime) {
		self.inner.lock().last_error =
			Some(LastError { message: message.into(), occurred_at });
	}

	/// Derives a health report using the current wall clock.
	pub fn snapshot(&self) -> HealthReport {
		self.snapshot_at(OffsetDateTime::now_utc())
	}

	/// Derives a health report as of `now` without mutating any counter.
	pub fn snapshot_at(&self, now: OffsetDateTime) -> HealthReport {
		let inner = self.inner.lock();
		let success_rate = if inner.requests.total == 0 {
			1.
		} else {
			inner.requests.success as f64 / inner.requests.total as f64
		};
		let average_latency_ms = if inner.latencies.is_empty() {
			0.
		} else {
			inner.latency_sum.whole_microseconds() as f64 / inner.latencies.len() as f64 / 1_000.
		};
		let cache_lookups = inner.cache.hits + inner.cache.misses;
		let cache_hit_rate =
			if cache_lookups == 0 { 0. } else { inner.cache.hits as f64 / cache_lookups as f64 };
		let checks = HealthChecks {
			success_rate_ok: success_rate >= SUCCESS_RATE_FLOOR,
			recent_error_free: inner
				.last_error
				.as_ref()
				.is_none_or(|error| now - error.occurred_at >= ERROR_QUIET_WINDOW),
			latency_ok: average_latency_ms < LATENCY_CEILING_MS,
			auth_failure_ratio_ok: inner.auth.failure == 0
				|| (inner.auth.success > 0
					&& (inner.auth.failure as f64)
						< AUTH_FAILURE_RATIO_CAP * inner.auth.success as f64),
		};
		let status = checks.derive_status();

		HealthReport {
			status,
			checks,
			uptime: now - inner.started_at,
			requests: inner.requests,
			success_rate,
			average_latency_ms,
			auth: inner.auth,
			cache: inner.cache,
			cache_hit_rate,
			last_error: inner.last_error.clone(),
		}
	}
}
impl Default for HealthMonitor {
	fn default() -> Self {
		Self::new()
	}
}

/// The four boolean checks backing the status derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthChecks {
	/// Success rate at or above 95 %; vacuously true with no traffic.
	pub success_rate_ok: bool,
	/// No error recorded within the last five minutes.
	pub recent_error_free: bool,
	/// Average latency below 5000 ms.
	pub latency_ok: bool,
	/// Auth failures below 10 % of auth successes; vacuously true with no failures.
	pub auth_failure_ratio_ok: bool,
}
impl HealthChecks {
	/// Number of checks passing, out of four.
	pub fn passed(&self) -> usize {
		[self.success_rate_ok, self.recent_error_free, self.latency_ok, self.auth_failure_ratio_ok]
			.iter()
			.filter(|check| **check)
			.count()
	}

	fn derive_status(&self) -> HealthStatus {
		let passed = self.passed();

		if passed == 4 {
			HealthStatus::Healthy
		} else if passed as f64 / 4. >= DEGRADED_FLOOR {
			HealthStatus::Degraded
		} else {
			HealthStatus::Unhealthy
		}
	}
}

/// Tri-state health verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	/// All four checks pass.
	Healthy,
	/// At least 70 % of the checks pass.
	Degraded,
	/// Fewer than 70 % of the checks pass.
	Unhealthy,
}
impl HealthStatus {
	/// Returns a stable label suitable for logs or wire formats.
	pub const fn as_str(self) -> &'static str {
		match self {
			HealthStatus::Healthy => "healthy",
			HealthStatus::Degraded => "degraded",
			HealthStatus::Unhealthy => "unhealthy",
		}
	}
}
impl Display for HealthStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Point-in-time health report derived from the monitor's counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
	/// Derived tri-state verdict.
	pub status: HealthStatus,
	/// The boolean checks backing the verdict.
	pub checks: HealthChecks,
	/// Time since the monitor was created.
	pub uptime: Duration,
	/// Request counters.
	pub requests: RequestTotals,
	/// Success fraction over all recorded requests; 1.0 with no traffic.
	pub success_rate: f64,
	/// Arithmetic mean of the retained latency samples, in milliseconds.
	pub average_latency_ms: f64,
	/// Authentication counters.
	pub auth: AuthTotals,
	/// Cache counters.
	pub cache: CacheTotals,
	/// Hit fraction over all recorded cache lookups.
	pub cache_hit_rate: f64,
	/// Most recent recorded error, if any.
	pub last_error: Option<LastError>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn average_latency_is_the_mean_of_retained_samples() {
		let monitor = HealthMonitor::new();

		for latency in [10, 20, 30] {
			monitor.record_request(true, Duration::milliseconds(latency));
		}

		let report = monitor.snapshot();

		assert_eq!(report.average_latency_ms, 20.);
		assert_eq!(report.success_rate, 1.);

		// A failed request still contributes its latency; only the rates diverge.
		monitor.record_request(false, Duration::milliseconds(40));

		let report = monitor.snapshot();

		assert_eq!(report.average_latency_ms, 25.);
		assert_eq!(report.requests.failure, 1);
		assert_eq!(report.success_rate, 0.75);
	}

	#[test]
	fn latency_window_is_bounded() {
		let monitor = HealthMonitor::new();

		for _ in 0..LATENCY_WINDOW {
			monitor.record_request(true, Duration::milliseconds(10));
		}
		// The next sample pushes the oldest one out; the mean follows the retained window.
		monitor.record_request(true, Duration::milliseconds(1_010));

		let report = monitor.snapshot();

		assert_eq!(report.average_latency_ms, 11.);
		assert_eq!(report.requests.total, LATENCY_WINDOW as u64 + 1);
	}

	#[test]
	fn snapshot_does_not_mutate() {
		let monitor = HealthMonitor::started_at(macros::datetime!(2025-11-10 12:00 UTC));
		let now = macros::datetime!(2025-11-10 12:05 UTC);

		monitor.record_request(true, Duration::milliseconds(100));

		assert_eq!(monitor.snapshot_at(now), monitor.snapshot_at(now));
	}

	#[test]
	fn error_recency_check_clears_after_five_minutes() {
		let monitor = HealthMonitor::started_at(macros::datetime!(2025-11-10 12:00 UTC));
		let occurred_at = macros::datetime!(2025-11-10 12:00 UTC);

		monitor.record_error_at("upstream 502", occurred_at);

		assert!(!monitor.snapshot_at(occurred_at + Duration::minutes(4)).checks.recent_error_free);
		assert!(monitor.snapshot_at(occurred_at + Duration::minutes(5)).checks.recent_error_free);
	}
}
